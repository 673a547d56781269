//! Domain model for the reporting task board.
//!
//! Tasks, users, and assignments are pure values. Mutations are expressed
//! as typed [`TaskMutation`] requests so that a single engine owns every
//! write to the task store.

mod assignment;
mod column;
mod error;
mod ids;
mod mutation;
mod task;
mod user;

pub use assignment::{
    Assignment, AssignmentPayload, AssignmentSchedule, AssignmentType, MonthlyDueDay,
};
pub use column::{BoardColumns, columns_of, parse_column};
pub use error::{BoardDomainError, ParsePriorityError, ParseTaskStatusError};
pub use ids::{ReportId, TaskId, UserId};
pub use mutation::{MutationRequest, RemoteCall, TaskMutation};
pub use task::{FieldSnapshot, Priority, Task, TaskData, TaskField, TaskStatus};
pub use user::{User, UserDirectory};
