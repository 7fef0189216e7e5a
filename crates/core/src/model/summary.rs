use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::{AnswerResult, LeaderboardEntry, PlayerName};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many results for a single session: {len}")]
    TooManyResults { len: usize },

    #[error("question count ({count}) does not match result count ({results})")]
    CountMismatch { count: u32, results: usize },

    #[error("total score ({total}) does not match awarded points ({sum})")]
    ScoreMismatch { total: u32, sum: u32 },
}

/// Aggregate summary for a finished quiz session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    player_name: PlayerName,
    total_score: u32,
    question_count: u32,
    results: Vec<AnswerResult>,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl SessionSummary {
    /// Rehydrate a summary from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError` if the stored totals disagree with the results.
    pub fn from_persisted(
        player_name: PlayerName,
        total_score: u32,
        question_count: u32,
        results: Vec<AnswerResult>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SummaryError> {
        if completed_at < started_at {
            return Err(SummaryError::InvalidTimeRange);
        }
        if usize::try_from(question_count).ok() != Some(results.len()) {
            return Err(SummaryError::CountMismatch {
                count: question_count,
                results: results.len(),
            });
        }
        let sum = results
            .iter()
            .fold(0_u32, |acc, r| acc.saturating_add(r.points));
        if sum != total_score {
            return Err(SummaryError::ScoreMismatch {
                total: total_score,
                sum,
            });
        }

        Ok(Self {
            player_name,
            total_score,
            question_count,
            results,
            started_at,
            completed_at,
        })
    }

    /// Build a summary from the ordered results of a session.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SummaryError::TooManyResults` if the result count cannot fit in `u32`.
    pub fn from_results(
        player_name: PlayerName,
        results: Vec<AnswerResult>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SummaryError> {
        let question_count = u32::try_from(results.len())
            .map_err(|_| SummaryError::TooManyResults { len: results.len() })?;
        let total_score = results
            .iter()
            .fold(0_u32, |acc, r| acc.saturating_add(r.points));

        Self::from_persisted(
            player_name,
            total_score,
            question_count,
            results,
            started_at,
            completed_at,
        )
    }

    #[must_use]
    pub fn player_name(&self) -> &PlayerName {
        &self.player_name
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn results(&self) -> &[AnswerResult] {
        &self.results
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Leaderboard record for this session, stamped with `recorded_at`.
    #[must_use]
    pub fn leaderboard_entry(&self, recorded_at: DateTime<Utc>) -> LeaderboardEntry {
        LeaderboardEntry::new(self.player_name.as_str(), self.total_score, recorded_at)
    }
}
