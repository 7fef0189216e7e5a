//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{PlayerNameError, SummaryError};
use storage::repository::StorageError;

use crate::sessions::SessionStatus;

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The difficulty filter selects no question, or names no known tier.
    #[error("no questions available for filter {filter}")]
    EmptyPool { filter: String },

    #[error("question count must be at least 1")]
    InvalidCount,

    #[error("no questions provided for session")]
    Empty,

    #[error("{operation} is not allowed while the session is {status}")]
    InvalidState {
        operation: &'static str,
        status: SessionStatus,
    },

    /// The index names a question other than the one awaiting an answer:
    /// already resolved, or not reached yet.
    #[error("question {expected} is not the current question (current is {current})")]
    StaleQuestion { expected: usize, current: usize },

    #[error("{0:?} is not one of the offered choices")]
    UnknownChoice(String),

    #[error(transparent)]
    PlayerName(#[from] PlayerNameError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
