use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::sync::Arc;
use tracing::info;

use quiz_core::QuestionBank;
use quiz_core::model::{AnswerResult, DifficultyFilter, LeaderboardEntry, PlayerName, SessionSummary};
use quiz_core::scoring::ScoringTable;
use storage::repository::{LeaderboardRepository, SessionSummaryRepository};

use super::aggregate::finalize;
use super::plan::SessionBuilder;
use super::progress::Countdown;
use super::service::QuizSession;
use crate::Clock;
use crate::error::SessionError;

/// A finished session after it has been written to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSession {
    pub summary_id: i64,
    pub summary: SessionSummary,
    pub leaderboard_entry: LeaderboardEntry,
}

/// Result of resolving a single question in a session.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizAnswerResult {
    pub result: AnswerResult,
    pub is_complete: bool,
    /// Present when this answer finished the quiz.
    pub persisted: Option<PersistedSession>,
}

/// Orchestrates session start, answering against the clock, and persistence on completion.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    bank: Arc<QuestionBank>,
    scoring: ScoringTable,
    leaderboard: Arc<dyn LeaderboardRepository>,
    summaries: Arc<dyn SessionSummaryRepository>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        bank: Arc<QuestionBank>,
        leaderboard: Arc<dyn LeaderboardRepository>,
        summaries: Arc<dyn SessionSummaryRepository>,
    ) -> Self {
        Self {
            clock,
            bank,
            scoring: ScoringTable::reference(),
            leaderboard,
            summaries,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Build a plan and start a new session for `player`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::PlayerName` for an invalid name, plus the
    /// errors of [`SessionBuilder::build`].
    pub fn start_session<R: Rng + ?Sized>(
        &self,
        player: &str,
        filter: DifficultyFilter,
        count: usize,
        rng: &mut R,
    ) -> Result<QuizSession, SessionError> {
        let player = PlayerName::new(player)?;
        let mut session = QuizSession::new(player, self.scoring);
        self.begin(&mut session, filter, count, rng)?;
        Ok(session)
    }

    /// Play a finished session again with a fresh plan.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is finished,
    /// plus the errors of [`SessionBuilder::build`].
    pub fn play_again<R: Rng + ?Sized>(
        &self,
        session: &mut QuizSession,
        filter: DifficultyFilter,
        count: usize,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        session.reset()?;
        self.begin(session, filter, count, rng)
    }

    fn begin<R: Rng + ?Sized>(
        &self,
        session: &mut QuizSession,
        filter: DifficultyFilter,
        count: usize,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        let plan = SessionBuilder::new(&self.bank)
            .with_filter(filter)
            .with_count(count)
            .build(rng)?;
        session.start(plan, self.clock.now())
    }

    /// Time left on the current question, read from the clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is in progress.
    pub fn remaining_time(&self, session: &QuizSession) -> Result<Duration, SessionError> {
        session.remaining_time(self.clock.now())
    }

    /// Countdown of the current question, read from the clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is in progress.
    pub fn countdown(&self, session: &QuizSession) -> Result<Countdown, SessionError> {
        session.countdown(self.clock.now())
    }

    /// Answer question `index` and persist the session if that finished it.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`QuizSession::submit`] and storage failures.
    pub async fn submit(
        &self,
        session: &mut QuizSession,
        index: usize,
        choice: &str,
    ) -> Result<QuizAnswerResult, SessionError> {
        let result = session.submit(index, choice, self.clock.now())?.clone();
        self.after_resolve(session, result).await
    }

    /// Skip question `index` and persist the session if that finished it.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`QuizSession::skip`] and storage failures.
    pub async fn skip(
        &self,
        session: &mut QuizSession,
        index: usize,
    ) -> Result<QuizAnswerResult, SessionError> {
        let result = session.skip(index, self.clock.now())?.clone();
        self.after_resolve(session, result).await
    }

    async fn after_resolve(
        &self,
        session: &mut QuizSession,
        result: AnswerResult,
    ) -> Result<QuizAnswerResult, SessionError> {
        let persisted = if session.is_complete() {
            Some(self.persist(session).await?)
        } else {
            None
        };
        Ok(QuizAnswerResult {
            result,
            is_complete: session.is_complete(),
            persisted,
        })
    }

    /// Finalize a finished session and append its summary and leaderboard entry.
    ///
    /// Each write happens at most once per play-through: after a partial
    /// failure, calling this again only performs the writes still missing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless finished, or storage errors.
    pub async fn persist(
        &self,
        session: &mut QuizSession,
    ) -> Result<PersistedSession, SessionError> {
        let finalized = finalize(session, self.clock.now())?;

        let summary_id = match session.saved_summary_id() {
            Some(id) => id,
            None => {
                let id = self.summaries.append_summary(&finalized.summary).await?;
                session.mark_summary_saved(id);
                id
            }
        };
        if !session.is_leaderboard_recorded() {
            self.leaderboard
                .append_entry(&finalized.leaderboard_entry)
                .await?;
            session.mark_leaderboard_recorded();
        }

        info!(
            summary_id,
            player = %finalized.summary.player_name(),
            score = finalized.summary.total_score(),
            "quiz results saved"
        );

        Ok(PersistedSession {
            summary_id,
            summary: finalized.summary,
            leaderboard_entry: finalized.leaderboard_entry,
        })
    }
}
