use async_trait::async_trait;
use quiz_core::model::{LeaderboardEntry, SessionSummary};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A persisted session summary together with its storage id.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummaryRow {
    pub id: i64,
    pub summary: SessionSummary,
}

impl SessionSummaryRow {
    #[must_use]
    pub fn new(id: i64, summary: SessionSummary) -> Self {
        Self { id, summary }
    }
}

/// Append-only store of leaderboard entries.
///
/// Implementations must return entries in insertion order; ranking for
/// display happens above this layer.
#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// Append one entry, returning its storage id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn append_entry(&self, entry: &LeaderboardEntry) -> Result<i64, StorageError>;

    /// All entries in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn list_entries(&self) -> Result<Vec<LeaderboardEntry>, StorageError>;
}

/// Store of finished session summaries, including per-question results.
#[async_trait]
pub trait SessionSummaryRepository: Send + Sync {
    /// Persist a summary and its ordered results, returning the summary id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the summary cannot be stored.
    async fn append_summary(&self, summary: &SessionSummary) -> Result<i64, StorageError>;

    /// Fetch a summary by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_summary(&self, id: i64) -> Result<SessionSummary, StorageError>;

    /// Most recently completed summaries first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn list_summary_rows(&self, limit: u32) -> Result<Vec<SessionSummaryRow>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    leaderboard: Arc<Mutex<Vec<LeaderboardEntry>>>,
    summaries: Arc<Mutex<Vec<SessionSummary>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn id_from_index(index: usize) -> Result<i64, StorageError> {
    i64::try_from(index + 1).map_err(|_| StorageError::Serialization("id overflow".into()))
}

#[async_trait]
impl LeaderboardRepository for InMemoryRepository {
    async fn append_entry(&self, entry: &LeaderboardEntry) -> Result<i64, StorageError> {
        let mut guard = self
            .leaderboard
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(entry.clone());
        id_from_index(guard.len() - 1)
    }

    async fn list_entries(&self) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let guard = self
            .leaderboard
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl SessionSummaryRepository for InMemoryRepository {
    async fn append_summary(&self, summary: &SessionSummary) -> Result<i64, StorageError> {
        let mut guard = self
            .summaries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(summary.clone());
        id_from_index(guard.len() - 1)
    }

    async fn get_summary(&self, id: i64) -> Result<SessionSummary, StorageError> {
        let guard = self
            .summaries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        usize::try_from(id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|index| guard.get(index))
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_summary_rows(&self, limit: u32) -> Result<Vec<SessionSummaryRow>, StorageError> {
        let guard = self
            .summaries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows = guard
            .iter()
            .enumerate()
            .map(|(index, summary)| Ok(SessionSummaryRow::new(id_from_index(index)?, summary.clone())))
            .collect::<Result<Vec<_>, StorageError>>()?;
        rows.sort_by(|a, b| {
            b.summary
                .completed_at()
                .cmp(&a.summary.completed_at())
                .then(b.id.cmp(&a.id))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(rows)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub leaderboard: Arc<dyn LeaderboardRepository>,
    pub session_summaries: Arc<dyn SessionSummaryRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let leaderboard: Arc<dyn LeaderboardRepository> = Arc::new(repo.clone());
        let session_summaries: Arc<dyn SessionSummaryRepository> = Arc::new(repo);
        Self {
            leaderboard,
            session_summaries,
        }
    }
}
