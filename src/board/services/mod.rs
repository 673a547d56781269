//! Application services for the task board.

mod assignment;
mod board;
mod config;
mod detail;
mod error;
mod in_flight;
mod mutator;
mod navigation;
mod session;
mod store;

pub use assignment::{
    AssignmentForm, AssignmentWorkflow, AssignmentWorkflowError, WorkflowAction,
    WorkflowClosure, WorkflowResult, WorkflowState,
};
pub use board::BoardController;
pub use config::BoardConfig;
pub use detail::{TaskDetailCoordinator, TaskDetailView};
pub use error::{BoardError, BoardResult, MutationFailed};
pub use in_flight::InFlightRegistry;
pub use mutator::{MutationOutcome, OptimisticMutator, PendingMutation};
pub use navigation::{Dialog, MAX_DIALOG_DEPTH, NavigationError, NavigationStack};
pub use session::BoardSession;
pub use store::{TaskStore, TaskStoreError, TaskStoreResult};
