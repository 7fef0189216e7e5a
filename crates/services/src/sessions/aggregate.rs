use chrono::{DateTime, Utc};

use quiz_core::model::{LeaderboardEntry, SessionSummary};

use super::service::{QuizSession, SessionStatus};
use crate::error::SessionError;

/// Everything handed to persistence once a session is over.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedSession {
    pub summary: SessionSummary,
    pub leaderboard_entry: LeaderboardEntry,
}

/// Summarize a finished session without touching it.
///
/// The leaderboard entry is stamped with `now`.
///
/// # Errors
///
/// Returns `SessionError::InvalidState` unless the session is finished.
pub fn finalize(session: &QuizSession, now: DateTime<Utc>) -> Result<FinalizedSession, SessionError> {
    let invalid = || SessionError::InvalidState {
        operation: "finalize",
        status: session.status(),
    };
    if session.status() != SessionStatus::Finished {
        return Err(invalid());
    }
    let started_at = session.started_at().ok_or_else(invalid)?;
    let completed_at = session.completed_at().ok_or_else(invalid)?;

    let summary = SessionSummary::from_results(
        session.player().clone(),
        session.results().to_vec(),
        started_at,
        completed_at,
    )?;
    let leaderboard_entry = summary.leaderboard_entry(now);

    Ok(FinalizedSession {
        summary,
        leaderboard_entry,
    })
}
