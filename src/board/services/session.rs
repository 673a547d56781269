//! Board session: the composition root of one mounted board.

use super::{
    assignment::{AssignmentWorkflow, AssignmentWorkflowError, WorkflowResult},
    board::BoardController,
    config::BoardConfig,
    detail::{TaskDetailCoordinator, TaskDetailView},
    error::{BoardError, BoardResult},
    mutator::{MutationOutcome, OptimisticMutator},
    store::TaskStore,
};
use crate::board::{
    domain::{ReportId, TaskId, UserDirectory},
    ports::TaskBoardApi,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// One mounted board with its store, controller, and dialogs.
pub struct BoardSession<A, C>
where
    A: TaskBoardApi,
    C: Clock + Send + Sync,
{
    report_id: ReportId,
    users: UserDirectory,
    board: BoardController<A>,
    details: TaskDetailCoordinator,
    assignment: Option<AssignmentWorkflow>,
    clock: Arc<C>,
}

impl<A, C> BoardSession<A, C>
where
    A: TaskBoardApi,
    C: Clock + Send + Sync,
{
    /// Mounts the board for a report.
    ///
    /// Fetches the report's tasks and the internal users once and seeds the
    /// task store and user directory with them.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Remote`] when either fetch fails.
    pub async fn mount(
        api: Arc<A>,
        clock: Arc<C>,
        config: BoardConfig,
        report_id: ReportId,
    ) -> BoardResult<Self> {
        let tasks = api.fetch_tasks(&report_id).await?;
        let users = UserDirectory::from_users(api.fetch_internal_users().await?);
        let store = TaskStore::from_tasks(tasks);
        info!(
            %report_id,
            tasks = store.len()?,
            users = users.len(),
            "board mounted"
        );

        let mutator = OptimisticMutator::new(store.clone(), api);
        Ok(Self {
            report_id,
            users,
            board: BoardController::new(mutator, config.clone()),
            details: TaskDetailCoordinator::new(store, config),
            assignment: None,
            clock,
        })
    }

    /// Returns the mounted report.
    #[must_use]
    pub const fn report_id(&self) -> &ReportId {
        &self.report_id
    }

    /// Returns the user reference table.
    #[must_use]
    pub const fn users(&self) -> &UserDirectory {
        &self.users
    }

    /// Returns the board controller.
    #[must_use]
    pub const fn board(&self) -> &BoardController<A> {
        &self.board
    }

    /// Returns the task store.
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        self.board.mutator().store()
    }

    /// Returns the detail coordinator.
    #[must_use]
    pub const fn details(&self) -> &TaskDetailCoordinator {
        &self.details
    }

    /// Returns the open assignment dialog, if any.
    #[must_use]
    pub const fn assignment(&self) -> Option<&AssignmentWorkflow> {
        self.assignment.as_ref()
    }

    /// Returns the open assignment dialog for editing, if any.
    pub const fn assignment_mut(&mut self) -> Option<&mut AssignmentWorkflow> {
        self.assignment.as_mut()
    }

    /// Opens the detail view of a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] for an unknown task.
    pub fn open_task_detail(&mut self, task_id: &TaskId) -> BoardResult<TaskDetailView> {
        self.assignment = None;
        self.details.open(task_id, &self.users)
    }

    /// Hands the visible detail view over to the assignment dialog.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NoDetailOpen`] when no detail view is visible.
    pub fn assign_from_detail(&mut self) -> BoardResult<&mut AssignmentWorkflow> {
        let workflow = self.details.delegate_to_assignment()?;
        Ok(self.assignment.insert(workflow))
    }

    /// Opens the assignment dialog for a task directly from the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] for an unknown task.
    pub fn open_assignment(&mut self, task_id: &TaskId) -> BoardResult<&mut AssignmentWorkflow> {
        let workflow = self.details.open_assignment(task_id)?;
        Ok(self.assignment.insert(workflow))
    }

    /// Submits the open assignment dialog and waits for the remote outcome.
    ///
    /// The dialog closes when the assignment is confirmed and stays open in
    /// the details step with an alert when it is rolled back.
    ///
    /// # Errors
    ///
    /// Returns guard errors from the workflow,
    /// [`BoardError::NoAssignmentOpen`] when no dialog is open, or
    /// [`BoardError::Store`] when board state is poisoned; the dialog then
    /// returns to the details step with an alert.
    pub async fn submit_assignment(&mut self) -> WorkflowResult<MutationOutcome> {
        let workflow = self
            .assignment
            .as_mut()
            .ok_or(AssignmentWorkflowError::Board(BoardError::NoAssignmentOpen))?;
        let pending = workflow.submit(self.board.mutator(), &*self.clock)?;
        let outcome = match pending.settle().await {
            Ok(outcome) => outcome,
            Err(err) => {
                workflow.abort_submission(&err);
                return Err(err.into());
            }
        };
        workflow.resolve(&outcome)?;
        self.details.finish_assignment(workflow);
        if !workflow.is_open() {
            self.assignment = None;
        }
        Ok(outcome)
    }

    /// Dismisses the open assignment dialog, returning to the detail view
    /// it was opened from.
    pub fn cancel_assignment(&mut self) {
        if let Some(mut workflow) = self.assignment.take() {
            workflow.cancel();
            self.details.finish_assignment(&workflow);
        }
    }

    /// Closes every dialog.
    pub fn close_dialogs(&mut self) {
        self.assignment = None;
        self.details.close();
    }

    /// Tears the board down. Remote results still in flight are discarded
    /// when they arrive.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] when board state is poisoned.
    pub fn close(mut self) -> BoardResult<()> {
        self.close_dialogs();
        self.board.mutator().registry().close()?;
        info!(report_id = %self.report_id, "board closed");
        Ok(())
    }
}
