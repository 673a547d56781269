//! Task detail drill-in and its hand-off to the assignment dialog.

use super::{
    assignment::{AssignmentWorkflow, WorkflowClosure, WorkflowState},
    config::BoardConfig,
    error::{BoardError, BoardResult},
    navigation::{Dialog, NavigationStack},
    store::TaskStore,
};
use crate::board::domain::{Task, TaskId, User, UserDirectory};

/// Read-only projection of a task for the detail dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetailView {
    /// The inspected task.
    pub task: Task,
    /// The resolved assignee, when assigned and known.
    pub assignee: Option<User>,
}

/// Opens task details and delegates to the assignment workflow.
///
/// Owns the dialog [`NavigationStack`]. Delegating pushes the assignment
/// dialog over the detail view, which hides it. A committed assignment
/// closes both; a cancelled one returns to the detail view.
#[derive(Debug, Clone)]
pub struct TaskDetailCoordinator {
    store: TaskStore,
    navigation: NavigationStack,
    config: BoardConfig,
}

impl TaskDetailCoordinator {
    /// Creates a coordinator reading from `store`.
    #[must_use]
    pub const fn new(store: TaskStore, config: BoardConfig) -> Self {
        Self {
            store,
            navigation: NavigationStack::new(),
            config,
        }
    }

    /// Returns the dialog stack.
    #[must_use]
    pub const fn navigation(&self) -> &NavigationStack {
        &self.navigation
    }

    /// Opens the detail view of a task, replacing any open dialogs.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] for an unknown task.
    pub fn open(&mut self, task_id: &TaskId, users: &UserDirectory) -> BoardResult<TaskDetailView> {
        let view = self.view_of(task_id, users)?;
        self.navigation.clear();
        self.navigation.push(Dialog::TaskDetail(task_id.clone()))?;
        Ok(view)
    }

    /// Returns the detail view when it is the visible dialog.
    ///
    /// The view is rebuilt from the store, so it reflects optimistic writes
    /// and rollbacks made since it was opened.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] if the task left the store.
    pub fn current_view(&self, users: &UserDirectory) -> BoardResult<Option<TaskDetailView>> {
        match self.navigation.top() {
            Some(Dialog::TaskDetail(task_id)) => self.view_of(task_id, users).map(Some),
            Some(Dialog::Assignment(_)) | None => Ok(None),
        }
    }

    /// Hands the visible detail view over to the assignment dialog.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NoDetailOpen`] when the detail view is not
    /// visible, or [`BoardError::NotFound`] if the task left the store.
    pub fn delegate_to_assignment(&mut self) -> BoardResult<AssignmentWorkflow> {
        let Some(Dialog::TaskDetail(task_id)) = self.navigation.top().cloned() else {
            return Err(BoardError::NoDetailOpen);
        };
        let workflow = AssignmentWorkflow::open(&self.task(&task_id)?, self.config.clone());
        self.navigation.push(Dialog::Assignment(task_id))?;
        Ok(workflow)
    }

    /// Opens the assignment dialog directly from the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] for an unknown task.
    pub fn open_assignment(&mut self, task_id: &TaskId) -> BoardResult<AssignmentWorkflow> {
        let workflow = AssignmentWorkflow::open(&self.task(task_id)?, self.config.clone());
        self.navigation.clear();
        self.navigation.push(Dialog::Assignment(task_id.clone()))?;
        Ok(workflow)
    }

    /// Updates navigation after the assignment dialog changed state.
    ///
    /// Open workflows leave the stack untouched.
    pub fn finish_assignment(&mut self, workflow: &AssignmentWorkflow) {
        match workflow.state() {
            WorkflowState::Closed(WorkflowClosure::Committed) => self.navigation.clear(),
            WorkflowState::Closed(WorkflowClosure::Cancelled) => {
                if matches!(self.navigation.top(), Some(Dialog::Assignment(_))) {
                    self.navigation.pop();
                }
            }
            WorkflowState::UserSelection
            | WorkflowState::AssignmentDetails
            | WorkflowState::Submitting => {}
        }
    }

    /// Closes every dialog.
    pub fn close(&mut self) {
        self.navigation.clear();
    }

    fn task(&self, task_id: &TaskId) -> BoardResult<Task> {
        self.store
            .get(task_id)?
            .ok_or_else(|| BoardError::NotFound(task_id.clone()))
    }

    fn view_of(&self, task_id: &TaskId, users: &UserDirectory) -> BoardResult<TaskDetailView> {
        let task = self.task(task_id)?;
        let assignee = task.assigned_to().and_then(|id| users.get(id)).cloned();
        Ok(TaskDetailView { task, assignee })
    }
}
