//! Service-level errors for board operations.

use super::{navigation::NavigationError, store::TaskStoreError};
use crate::board::{
    domain::{BoardDomainError, TaskField, TaskId},
    ports::RemoteError,
};
use thiserror::Error;

/// Errors returned by board services.
#[derive(Debug, Clone, Error)]
pub enum BoardError {
    /// The mutation target is not in the task store.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The drop target is not a board column.
    #[error("invalid drop target column: {0}")]
    InvalidColumn(String),

    /// A detail hand-off was requested while no detail view is visible.
    #[error("no task detail view is open")]
    NoDetailOpen,

    /// An assignment action was requested while no assignment dialog is open.
    #[error("no assignment dialog is open")]
    NoAssignmentOpen,

    /// A dialog could not be opened.
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(BoardDomainError),

    /// Board state bookkeeping failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),

    /// A bulk fetch failed while mounting the board.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl From<BoardDomainError> for BoardError {
    fn from(err: BoardDomainError) -> Self {
        match err {
            BoardDomainError::InvalidColumn(column) => Self::InvalidColumn(column),
            other => Self::Domain(other),
        }
    }
}

/// Result type for board service operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// A remote write was rejected after its optimistic update and the task
/// was restored.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("mutation of {field} on task {task_id} failed: {reason}")]
pub struct MutationFailed {
    /// Task whose field was rolled back.
    pub task_id: TaskId,
    /// Field group that was rolled back.
    pub field: TaskField,
    /// Failure reported by the remote call.
    pub reason: String,
}
