use chrono::{DateTime, Duration, Utc};
use std::fmt;
use tracing::{debug, info, warn};

use quiz_core::model::{AnswerOutcome, AnswerResult, PlayerName, QuestionRecord};
use quiz_core::scoring::{Assessment, DifficultyProfile, ScoringTable};
use quiz_core::time::{duration_from_secs_f64, elapsed_seconds};

use super::plan::SessionPlan;
use super::progress::{Countdown, SessionProgress};
use crate::error::SessionError;

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Finished,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionStatus::NotStarted => "not started",
            SessionStatus::InProgress => "in progress",
            SessionStatus::Finished => "finished",
        })
    }
}

//
// ─── CURRENT QUESTION ──────────────────────────────────────────────────────────
//

/// The question awaiting an answer, with its tier profile.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentQuestion<'a> {
    /// Zero-based position; pass it back to `submit`/`skip`.
    pub index: usize,
    pub total: usize,
    pub question: &'a QuestionRecord,
    pub profile: DifficultyProfile,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One player's quiz, stepped through question by question.
///
/// The countdown is never stored: remaining time and lateness are derived from
/// `question_started_at` and the `now` passed in, so polling has no effect on
/// the session and a late refresh cannot change a score.
pub struct QuizSession {
    player: PlayerName,
    scoring: ScoringTable,
    questions: Vec<QuestionRecord>,
    current: usize,
    score: u32,
    results: Vec<AnswerResult>,
    status: SessionStatus,
    question_started_at: Option<DateTime<Utc>>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    saved_summary_id: Option<i64>,
    leaderboard_recorded: bool,
}

impl QuizSession {
    #[must_use]
    pub fn new(player: PlayerName, scoring: ScoringTable) -> Self {
        Self {
            player,
            scoring,
            questions: Vec::new(),
            current: 0,
            score: 0,
            results: Vec::new(),
            status: SessionStatus::NotStarted,
            question_started_at: None,
            started_at: None,
            completed_at: None,
            saved_summary_id: None,
            leaderboard_recorded: false,
        }
    }

    /// Begin the quiz with the planned questions; the first countdown starts at `now`.
    ///
    /// A finished session may be started again directly; it is reset first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` while a quiz is in progress and
    /// `SessionError::Empty` for a plan without questions.
    pub fn start(&mut self, plan: SessionPlan, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.status == SessionStatus::InProgress {
            return Err(SessionError::InvalidState {
                operation: "start",
                status: self.status,
            });
        }
        if plan.is_empty() {
            return Err(SessionError::Empty);
        }
        if self.status == SessionStatus::Finished {
            self.reset()?;
        }

        info!(
            player = %self.player,
            filter = %plan.filter,
            questions = plan.total(),
            "quiz started"
        );

        self.questions = plan.questions;
        self.current = 0;
        self.score = 0;
        self.results.clear();
        self.status = SessionStatus::InProgress;
        self.question_started_at = Some(now);
        self.started_at = Some(now);
        self.completed_at = None;
        self.saved_summary_id = None;
        self.leaderboard_recorded = false;
        Ok(())
    }

    /// Return a finished session to `NotStarted` so it can be played again.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is finished.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::Finished {
            return Err(SessionError::InvalidState {
                operation: "reset",
                status: self.status,
            });
        }
        self.questions.clear();
        self.current = 0;
        self.score = 0;
        self.results.clear();
        self.status = SessionStatus::NotStarted;
        self.question_started_at = None;
        self.started_at = None;
        self.completed_at = None;
        self.saved_summary_id = None;
        self.leaderboard_recorded = false;
        Ok(())
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Finished
    }

    #[must_use]
    pub fn player(&self) -> &PlayerName {
        &self.player
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn results(&self) -> &[AnswerResult] {
        &self.results
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Storage id of this play-through's summary, once written.
    #[must_use]
    pub fn saved_summary_id(&self) -> Option<i64> {
        self.saved_summary_id
    }

    #[must_use]
    pub fn is_leaderboard_recorded(&self) -> bool {
        self.leaderboard_recorded
    }

    pub(crate) fn mark_summary_saved(&mut self, id: i64) {
        self.saved_summary_id = Some(id);
    }

    pub(crate) fn mark_leaderboard_recorded(&mut self) {
        self.leaderboard_recorded = true;
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_questions(),
            answered: self.results.len(),
            remaining: self.total_questions().saturating_sub(self.current),
            score: self.score,
            is_complete: self.is_complete(),
        }
    }

    /// The question awaiting an answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is in progress.
    pub fn current_question(&self) -> Result<CurrentQuestion<'_>, SessionError> {
        self.current_question_for("current_question")
    }

    /// Seconds since the current question was shown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is in progress.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> Result<f64, SessionError> {
        self.elapsed_for("elapsed_seconds", now)
    }

    /// `max(0, time_limit - elapsed)` for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is in progress.
    pub fn remaining_time(&self, now: DateTime<Utc>) -> Result<Duration, SessionError> {
        let current = self.current_question_for("remaining_time")?;
        let elapsed = self.elapsed_for("remaining_time", now)?;
        Ok(duration_from_secs_f64(
            current.profile.remaining_seconds(elapsed),
        ))
    }

    /// Countdown of the current question, for display. Reading it changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is in progress.
    pub fn countdown(&self, now: DateTime<Utc>) -> Result<Countdown, SessionError> {
        let current = self.current_question_for("countdown")?;
        let elapsed = self.elapsed_for("countdown", now)?;
        Ok(Countdown {
            elapsed_secs: elapsed,
            remaining_secs: current.profile.remaining_whole_seconds(elapsed),
            fraction: current.profile.elapsed_fraction(elapsed),
            is_expired: current.profile.is_expired(elapsed),
        })
    }

    /// Whether the countdown of the current question has run out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is in progress.
    pub fn is_time_up(&self, now: DateTime<Utc>) -> Result<bool, SessionError> {
        let current = self.current_question_for("is_time_up")?;
        let elapsed = self.elapsed_for("is_time_up", now)?;
        Ok(current.profile.is_expired(elapsed))
    }

    /// Answer question `index` with `choice`.
    ///
    /// Submissions after the time limit are recorded with the picked choice but
    /// score zero.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless in progress,
    /// `SessionError::StaleQuestion` if `index` is not the current question and
    /// `SessionError::UnknownChoice` if `choice` is not offered.
    pub fn submit(
        &mut self,
        index: usize,
        choice: &str,
        now: DateTime<Utc>,
    ) -> Result<&AnswerResult, SessionError> {
        let current = self.guard_index("submit", index)?;
        if !current.question.has_choice(choice) {
            return Err(SessionError::UnknownChoice(choice.to_owned()));
        }

        let difficulty = current.question.difficulty();
        let correct = current.question.is_correct(choice);
        let elapsed = self.elapsed_for("submit", now)?;
        let assessment = self.scoring.assess(difficulty, correct, elapsed);

        if assessment.outcome == AnswerOutcome::TimedOut {
            warn!(
                index,
                elapsed_secs = elapsed,
                limit_secs = current.profile.time_limit_secs(),
                "answer submitted after time limit"
            );
        }

        self.resolve(Some(choice.to_owned()), assessment, elapsed, now)
    }

    /// Skip question `index`. Always scores zero.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless in progress and
    /// `SessionError::StaleQuestion` if `index` is not the current question.
    pub fn skip(&mut self, index: usize, now: DateTime<Utc>) -> Result<&AnswerResult, SessionError> {
        self.guard_index("skip", index)?;
        let elapsed = self.elapsed_for("skip", now)?;
        let assessment = Assessment {
            outcome: AnswerOutcome::Skipped,
            points: 0,
        };
        self.resolve(None, assessment, elapsed, now)
    }

    fn current_question_for(
        &self,
        operation: &'static str,
    ) -> Result<CurrentQuestion<'_>, SessionError> {
        if self.status != SessionStatus::InProgress {
            return Err(SessionError::InvalidState {
                operation,
                status: self.status,
            });
        }
        let question = self
            .questions
            .get(self.current)
            .ok_or(SessionError::InvalidState {
                operation,
                status: self.status,
            })?;
        Ok(CurrentQuestion {
            index: self.current,
            total: self.questions.len(),
            question,
            profile: self.scoring.profile(question.difficulty()),
        })
    }

    fn elapsed_for(&self, operation: &'static str, now: DateTime<Utc>) -> Result<f64, SessionError> {
        let started = self.question_started_at.ok_or(SessionError::InvalidState {
            operation,
            status: self.status,
        })?;
        Ok(elapsed_seconds(started, now))
    }

    fn guard_index(
        &self,
        operation: &'static str,
        index: usize,
    ) -> Result<CurrentQuestion<'_>, SessionError> {
        let current = self.current_question_for(operation)?;
        if current.index != index {
            return Err(SessionError::StaleQuestion {
                expected: index,
                current: current.index,
            });
        }
        Ok(current)
    }

    fn resolve(
        &mut self,
        selected: Option<String>,
        assessment: Assessment,
        elapsed: f64,
        now: DateTime<Utc>,
    ) -> Result<&AnswerResult, SessionError> {
        let question = self
            .questions
            .get(self.current)
            .ok_or(SessionError::InvalidState {
                operation: "resolve",
                status: self.status,
            })?;

        self.results.push(AnswerResult {
            question: question.text().to_owned(),
            selected,
            correct_answer: question.correct_answer().to_owned(),
            difficulty: question.difficulty(),
            elapsed_seconds: elapsed,
            points: assessment.points,
            outcome: assessment.outcome,
        });

        debug!(
            index = self.current,
            outcome = %assessment.outcome,
            elapsed_secs = elapsed,
            points = assessment.points,
            "question resolved"
        );

        self.score = self.score.saturating_add(assessment.points);
        self.current += 1;
        self.question_started_at = Some(now);

        if self.current >= self.questions.len() {
            self.status = SessionStatus::Finished;
            self.completed_at = Some(now);
            info!(player = %self.player, score = self.score, "quiz finished");
        }

        self.results.last().ok_or(SessionError::Empty)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("player", &self.player)
            .field("status", &self.status)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("results_len", &self.results.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .field("saved_summary_id", &self.saved_summary_id)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Difficulty, DifficultyFilter};
    use quiz_core::time::fixed_now;

    fn question(text: &str, difficulty: Difficulty) -> QuestionRecord {
        QuestionRecord::new(
            text,
            vec!["right".into(), "wrong".into()],
            "right",
            difficulty,
        )
        .unwrap()
    }

    fn plan(questions: Vec<QuestionRecord>) -> SessionPlan {
        let n = questions.len();
        SessionPlan {
            questions,
            filter: DifficultyFilter::Mixed,
            requested: n,
            pool_size: n,
        }
    }

    fn started(questions: Vec<QuestionRecord>) -> QuizSession {
        let mut session = QuizSession::new(PlayerName::new("Ada").unwrap(), ScoringTable::reference());
        session.start(plan(questions), fixed_now()).unwrap();
        session
    }

    fn secs(s: f64) -> DateTime<Utc> {
        fixed_now() + duration_from_secs_f64(s)
    }

    #[test]
    fn easy_correct_at_two_seconds_awards_88() {
        let mut session = started(vec![question("e", Difficulty::Easy)]);
        let result = session.submit(0, "right", secs(2.0)).unwrap();
        assert_eq!(result.points, 88);
        assert_eq!(result.outcome, AnswerOutcome::Correct);
        assert_eq!(session.score(), 88);
    }

    #[test]
    fn late_correct_answer_scores_zero_but_keeps_choice() {
        let mut session = started(vec![question("h", Difficulty::Hard)]);
        let result = session.submit(0, "right", secs(11.0)).unwrap();
        assert_eq!(result.points, 0);
        assert_eq!(result.outcome, AnswerOutcome::TimedOut);
        assert_eq!(result.selected.as_deref(), Some("right"));
    }

    #[test]
    fn incorrect_answer_scores_zero() {
        let mut session = started(vec![question("m", Difficulty::Medium)]);
        let result = session.submit(0, "wrong", secs(1.0)).unwrap();
        assert_eq!(result.points, 0);
        assert_eq!(result.outcome, AnswerOutcome::Incorrect);
    }

    #[test]
    fn skip_scores_zero_even_when_fast() {
        let mut session = started(vec![question("e", Difficulty::Easy)]);
        let result = session.skip(0, secs(0.5)).unwrap();
        assert_eq!(result.points, 0);
        assert_eq!(result.selected, None);
        assert_eq!(result.outcome, AnswerOutcome::Skipped);
    }

    #[test]
    fn each_question_is_timed_from_the_previous_resolution() {
        let mut session = started(vec![
            question("a", Difficulty::Easy),
            question("b", Difficulty::Easy),
        ]);
        session.submit(0, "right", secs(14.0)).unwrap();
        // Second question started at 14s; answered 2s later.
        let result = session.submit(1, "right", secs(16.0)).unwrap();
        assert!((result.elapsed_seconds - 2.0).abs() < 1e-9);
        assert_eq!(result.points, 88);
    }

    #[test]
    fn finishes_after_all_questions_in_any_mix() {
        let mut session = started(vec![
            question("a", Difficulty::Easy),
            question("b", Difficulty::Medium),
            question("c", Difficulty::Hard),
        ]);
        session.skip(0, secs(1.0)).unwrap();
        session.submit(1, "wrong", secs(2.0)).unwrap();
        assert_eq!(session.status(), SessionStatus::InProgress);
        session.submit(2, "right", secs(3.0)).unwrap();

        assert_eq!(session.status(), SessionStatus::Finished);
        assert_eq!(session.results().len(), 3);
        assert_eq!(session.completed_at(), Some(secs(3.0)));
        assert!(matches!(
            session.current_question(),
            Err(SessionError::InvalidState { .. })
        ));
        assert!(matches!(
            session.skip(2, secs(4.0)),
            Err(SessionError::InvalidState { .. })
        ));
    }

    #[test]
    fn results_track_index_while_in_progress() {
        let mut session = started(vec![
            question("a", Difficulty::Easy),
            question("b", Difficulty::Easy),
            question("c", Difficulty::Easy),
        ]);
        for i in 0..3 {
            assert_eq!(session.results().len(), session.current_index());
            session.skip(i, secs(1.0 + i as f64)).unwrap();
        }
        assert_eq!(session.results().len(), session.current_index());
    }

    #[test]
    fn second_submit_for_same_question_is_rejected() {
        let mut session = started(vec![
            question("a", Difficulty::Easy),
            question("b", Difficulty::Easy),
        ]);
        session.submit(0, "right", secs(1.0)).unwrap();
        let err = session.submit(0, "right", secs(1.1)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::StaleQuestion {
                expected: 0,
                current: 1
            }
        ));
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.score(), 94);
    }

    #[test]
    fn unknown_choice_is_rejected_without_advancing() {
        let mut session = started(vec![question("a", Difficulty::Easy)]);
        let err = session.submit(0, "maybe", secs(1.0)).unwrap_err();
        assert!(matches!(err, SessionError::UnknownChoice(_)));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn operations_before_start_are_invalid() {
        let mut session =
            QuizSession::new(PlayerName::new("Ada").unwrap(), ScoringTable::reference());
        assert_eq!(session.status(), SessionStatus::NotStarted);
        assert!(matches!(
            session.current_question(),
            Err(SessionError::InvalidState { .. })
        ));
        assert!(matches!(
            session.submit(0, "right", fixed_now()),
            Err(SessionError::InvalidState { .. })
        ));
        assert!(matches!(
            session.remaining_time(fixed_now()),
            Err(SessionError::InvalidState { .. })
        ));
        assert!(matches!(session.reset(), Err(SessionError::InvalidState { .. })));
    }

    #[test]
    fn remaining_time_is_derived_and_side_effect_free() {
        let session = started(vec![question("e", Difficulty::Easy)]);
        let before = session.progress();

        assert_eq!(
            session.remaining_time(secs(4.5)).unwrap(),
            Duration::milliseconds(10_500)
        );
        assert_eq!(session.remaining_time(secs(4.5)).unwrap(), Duration::milliseconds(10_500));
        assert_eq!(session.remaining_time(secs(30.0)).unwrap(), Duration::zero());
        assert!(session.is_time_up(secs(15.0)).unwrap());
        assert!(!session.is_time_up(secs(14.9)).unwrap());

        assert_eq!(session.progress(), before);
        assert!(session.results().is_empty());
    }

    #[test]
    fn countdown_reports_whole_seconds_and_fraction() {
        let session = started(vec![question("m", Difficulty::Medium)]);
        let countdown = session.countdown(secs(4.7)).unwrap();
        assert_eq!(countdown.remaining_secs, 7);
        assert!(!countdown.is_expired);

        let late = session.countdown(secs(12.0)).unwrap();
        assert_eq!(late.remaining_secs, 0);
        assert!((late.fraction - 1.0).abs() < f64::EPSILON);
        assert!(late.is_expired);
        assert!(session.results().is_empty());
    }

    #[test]
    fn start_while_in_progress_is_rejected() {
        let mut session = started(vec![question("a", Difficulty::Easy)]);
        let err = session
            .start(plan(vec![question("b", Difficulty::Easy)]), fixed_now())
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidState { operation: "start", .. }));
    }

    #[test]
    fn reset_after_finish_allows_replay() {
        let mut session = started(vec![question("a", Difficulty::Easy)]);
        session.submit(0, "right", secs(1.0)).unwrap();
        session.reset().unwrap();

        assert_eq!(session.status(), SessionStatus::NotStarted);
        assert_eq!(session.score(), 0);
        assert!(session.results().is_empty());

        session
            .start(plan(vec![question("b", Difficulty::Hard)]), secs(10.0))
            .unwrap();
        assert_eq!(session.current_question().unwrap().question.text(), "b");
    }

    #[test]
    fn empty_plan_leaves_finished_session_intact() {
        let mut session = started(vec![question("a", Difficulty::Easy)]);
        session.submit(0, "right", secs(1.0)).unwrap();

        assert!(matches!(
            session.start(plan(Vec::new()), secs(2.0)),
            Err(SessionError::Empty)
        ));
        assert_eq!(session.status(), SessionStatus::Finished);
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.score(), 94);
    }

    #[test]
    fn future_index_is_rejected_with_both_indices() {
        let mut session = started(vec![
            question("a", Difficulty::Easy),
            question("b", Difficulty::Easy),
        ]);
        let err = session.skip(1, secs(1.0)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::StaleQuestion {
                expected: 1,
                current: 0
            }
        ));
        assert_eq!(err.to_string(), "question 1 is not the current question (current is 0)");
        assert!(session.results().is_empty());
    }

    #[test]
    fn empty_plan_is_rejected() {
        let mut session =
            QuizSession::new(PlayerName::new("Ada").unwrap(), ScoringTable::reference());
        assert!(matches!(
            session.start(plan(Vec::new()), fixed_now()),
            Err(SessionError::Empty)
        ));
    }

    #[test]
    fn current_question_carries_profile() {
        let session = started(vec![question("h", Difficulty::Hard)]);
        let current = session.current_question().unwrap();
        assert_eq!(current.index, 0);
        assert_eq!(current.total, 1);
        assert_eq!(current.profile.base_points(), 200);
        assert_eq!(current.profile.time_limit_secs(), 10);
    }
}
