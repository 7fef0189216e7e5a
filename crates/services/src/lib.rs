#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::SessionError;

pub use sessions::{
    Countdown, CurrentQuestion, FinalizedSession, LeaderboardService, PersistedSession,
    QuizAnswerResult,
    QuizLoopService, QuizSession, SessionBuilder, SessionPlan, SessionProgress, SessionStatus,
    SessionSummaryListItem, SessionSummaryService, detailed_results_json, finalize,
    render_summary_document,
};
