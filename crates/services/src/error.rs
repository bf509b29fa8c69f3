//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{PlayerNameError, QuestionError, ScoreError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while loading or preparing a question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question bank has no questions")]
    Empty,
    #[error("question bank declares {declared} questions but contains {actual}")]
    CountMismatch { declared: usize, actual: usize },
    #[error("question id {0} appears more than once")]
    DuplicateId(u32),
    #[error("time limit must be > 0")]
    InvalidTimeLimit,
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error("invalid question bank json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors emitted by quiz sessions.
///
/// `NoSelection` and `InvalidOption` are user-input errors: show a prompt and
/// let the player try again.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("please choose an answer before moving on")]
    NoSelection,
    #[error("option {index} does not exist on this question")]
    InvalidOption { index: usize },
    #[error("quiz is not in progress")]
    NotInProgress,
    #[error("quiz has already started")]
    AlreadyStarted,
    #[error("quiz has not been completed")]
    NotCompleted,
    #[error(transparent)]
    QuestionBank(#[from] QuestionBankError),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// True for mistakes the player can correct in place.
    #[must_use]
    pub fn is_user_input(&self) -> bool {
        matches!(self, Self::NoSelection | Self::InvalidOption { .. })
    }
}

/// Errors emitted by `PlayerService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlayerError {
    #[error(transparent)]
    InvalidName(#[from] PlayerNameError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    QuestionBank(#[from] QuestionBankError),
}
