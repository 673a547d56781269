//! Remote API port consumed by the board.

use crate::board::domain::{AssignmentPayload, Priority, ReportId, Task, TaskId, TaskStatus, User};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote API operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Remote reporting API contract.
///
/// Every call may fail for any reason; callers only distinguish success
/// from failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskBoardApi: Send + Sync {
    /// Fetches every task of a report. Called once when the board mounts.
    async fn fetch_tasks(&self, report_id: &ReportId) -> RemoteResult<Vec<Task>>;

    /// Fetches the internal users available for assignment.
    async fn fetch_internal_users(&self) -> RemoteResult<Vec<User>>;

    /// Persists status and priority of a task atomically.
    ///
    /// Idempotent: repeating a call with the same arguments leaves the same
    /// final state.
    async fn persist_task_status(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
        priority: Priority,
    ) -> RemoteResult<()>;

    /// Persists an assignment. No server identifier is returned.
    async fn persist_assignment(&self, payload: &AssignmentPayload) -> RemoteResult<()>;
}

/// Errors returned by remote API adapters.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The server rejected the request.
    #[error("remote rejected request: {0}")]
    Rejected(String),

    /// The request could not be delivered or answered.
    #[error("remote transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl RemoteError {
    /// Creates a rejection with the given reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
