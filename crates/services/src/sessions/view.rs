use chrono::{DateTime, Utc};
use std::sync::Arc;

use quiz_core::model::{RankedEntry, rank_entries};
use storage::repository::{
    InMemoryRepository, LeaderboardRepository, SessionSummaryRepository, SessionSummaryRow,
};

use crate::error::SessionError;

/// Presentation-agnostic list item for a stored session summary.
///
/// No pre-formatted strings; the UI formats timestamps as it likes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummaryListItem {
    pub id: i64,
    pub player_name: String,
    pub total_score: u32,
    pub question_count: u32,
    pub completed_at: DateTime<Utc>,
}

impl SessionSummaryListItem {
    #[must_use]
    pub fn from_row(row: &SessionSummaryRow) -> Self {
        let summary = &row.summary;
        Self {
            id: row.id,
            player_name: summary.player_name().as_str().to_owned(),
            total_score: summary.total_score(),
            question_count: summary.question_count(),
            completed_at: summary.completed_at(),
        }
    }
}

/// Read side of the leaderboard: ranking happens here, never in storage.
#[derive(Clone)]
pub struct LeaderboardService {
    leaderboard: Arc<dyn LeaderboardRepository>,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(leaderboard: Arc<dyn LeaderboardRepository>) -> Self {
        Self { leaderboard }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }

    /// Entries ranked by score, highest first; ties keep insertion order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn ranked(&self, limit: Option<usize>) -> Result<Vec<RankedEntry>, SessionError> {
        let entries = self.leaderboard.list_entries().await?;
        let mut ranked = rank_entries(&entries);
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        Ok(ranked)
    }
}

/// Listing of stored session summaries.
#[derive(Clone)]
pub struct SessionSummaryService {
    summaries: Arc<dyn SessionSummaryRepository>,
}

impl SessionSummaryService {
    #[must_use]
    pub fn new(summaries: Arc<dyn SessionSummaryRepository>) -> Self {
        Self { summaries }
    }

    /// Most recently completed sessions first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<SessionSummaryListItem>, SessionError> {
        let rows = self.summaries.list_summary_rows(limit).await?;
        Ok(rows.iter().map(SessionSummaryListItem::from_row).collect())
    }
}
