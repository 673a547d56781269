//! Status partitioning of tasks into board columns.

use super::{BoardDomainError, Task, TaskId, TaskStatus};

/// Resolves a drop-target column identifier to a status.
///
/// # Errors
///
/// Returns [`BoardDomainError::InvalidColumn`] when the identifier does not
/// name one of the board columns.
pub fn parse_column(column_id: &str) -> Result<TaskStatus, BoardDomainError> {
    TaskStatus::try_from(column_id)
        .map_err(|_| BoardDomainError::InvalidColumn(column_id.to_owned()))
}

/// Tasks partitioned by status, preserving input order within each column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardColumns {
    pending: Vec<Task>,
    in_progress: Vec<Task>,
    completed: Vec<Task>,
}

impl BoardColumns {
    /// Returns the tasks in the column for `status`.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Pending => &self.pending,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Completed => &self.completed,
        }
    }

    /// Iterates columns in board order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, &[Task])> {
        TaskStatus::ALL
            .into_iter()
            .map(move |status| (status, self.column(status)))
    }

    /// Returns the status of the column containing `task_id`, if any.
    #[must_use]
    pub fn locate(&self, task_id: &TaskId) -> Option<TaskStatus> {
        self.iter()
            .find(|(_, tasks)| tasks.iter().any(|task| task.id() == task_id))
            .map(|(status, _)| status)
    }

    /// Returns the total number of tasks across all columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len() + self.in_progress.len() + self.completed.len()
    }

    /// Returns `true` when the board has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn column_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        match status {
            TaskStatus::Pending => &mut self.pending,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Completed => &mut self.completed,
        }
    }
}

/// Partitions tasks into columns by status. Every task lands in exactly one
/// column.
#[must_use]
pub fn columns_of(tasks: impl IntoIterator<Item = Task>) -> BoardColumns {
    let mut columns = BoardColumns::default();
    for task in tasks {
        columns.column_mut(task.status()).push(task);
    }
    columns
}
