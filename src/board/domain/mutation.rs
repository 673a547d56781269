//! Typed mutation requests and the remote calls they produce.

use super::{
    Assignment, AssignmentPayload, FieldSnapshot, Priority, Task, TaskField, TaskId, TaskStatus,
};

/// Change to one field group of a task.
///
/// Board interactions and the assignment workflow emit these; only the
/// optimistic mutator applies them to the task store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskMutation {
    /// Move the task to another column.
    SetStatus(TaskStatus),
    /// Replace the priority.
    SetPriority(Priority),
    /// Assign the task and set its derived due date.
    Assign(Assignment),
    /// Edit the UI-local title and description.
    EditContent {
        /// New title.
        title: String,
        /// New description.
        description: String,
    },
}

impl TaskMutation {
    /// Returns the field group the mutation touches.
    #[must_use]
    pub const fn field(&self) -> TaskField {
        match self {
            Self::SetStatus(_) => TaskField::Status,
            Self::SetPriority(_) => TaskField::Priority,
            Self::Assign(_) => TaskField::Assignment,
            Self::EditContent { .. } => TaskField::Content,
        }
    }

    /// Returns the task with the mutation applied.
    #[must_use]
    pub fn applied_to(&self, task: &Task) -> Task {
        let mut next = task.clone();
        let snapshot = match self {
            Self::SetStatus(status) => FieldSnapshot::Status(*status),
            Self::SetPriority(priority) => FieldSnapshot::Priority(*priority),
            Self::Assign(assignment) => FieldSnapshot::Assignment {
                assigned_to: Some(assignment.employee_id().clone()),
                due_date: Some(assignment.due_date()),
            },
            Self::EditContent { title, description } => FieldSnapshot::Content {
                title: title.clone(),
                description: description.clone(),
            },
        };
        next.restore(snapshot);
        next
    }

    /// Returns the remote call persisting `next`, or `None` for local-only
    /// edits.
    ///
    /// Status and priority are persisted together because the endpoint
    /// takes both atomically.
    #[must_use]
    pub fn remote_call(&self, next: &Task) -> Option<RemoteCall> {
        match self {
            Self::SetStatus(_) | Self::SetPriority(_) => Some(RemoteCall::PersistTaskStatus {
                task_id: next.id().clone(),
                status: next.status(),
                priority: next.priority(),
            }),
            Self::Assign(assignment) => Some(RemoteCall::PersistAssignment(
                assignment.payload(next.id().clone()),
            )),
            Self::EditContent { .. } => None,
        }
    }
}

/// Mutation addressed to a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRequest {
    /// Target task.
    pub task_id: TaskId,
    /// Change to apply.
    pub mutation: TaskMutation,
}

impl MutationRequest {
    /// Creates a request.
    #[must_use]
    pub const fn new(task_id: TaskId, mutation: TaskMutation) -> Self {
        Self { task_id, mutation }
    }
}

/// Remote write issued after an optimistic update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    /// `persistTaskStatus(id, status, priority)`.
    PersistTaskStatus {
        /// Task identifier.
        task_id: TaskId,
        /// Status to persist.
        status: TaskStatus,
        /// Priority persisted alongside the status.
        priority: Priority,
    },
    /// `persistAssignment(payload)`.
    PersistAssignment(AssignmentPayload),
}
