mod aggregate;
mod plan;
mod progress;
mod report;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use aggregate::{FinalizedSession, finalize};
pub use plan::{SessionBuilder, SessionPlan};
pub use progress::{Countdown, SessionProgress};
pub use report::{detailed_results_json, render_summary_document};
pub use service::{CurrentQuestion, QuizSession, SessionStatus};
pub use view::{LeaderboardService, SessionSummaryListItem, SessionSummaryService};
pub use workflow::{PersistedSession, QuizAnswerResult, QuizLoopService};
