//! Board interaction controller.
//!
//! Translates drag-and-drop, priority clicks, and card edits into mutation
//! requests for the [`OptimisticMutator`] and exposes the column view.

use super::{
    config::BoardConfig,
    error::{BoardError, BoardResult},
    mutator::{OptimisticMutator, PendingMutation},
};
use crate::board::{
    domain::{
        BoardColumns, BoardDomainError, MutationRequest, Task, TaskId, TaskMutation, columns_of,
        parse_column,
    },
    ports::TaskBoardApi,
};
use tracing::debug;

/// Maps board events to optimistic mutations.
pub struct BoardController<A>
where
    A: TaskBoardApi,
{
    mutator: OptimisticMutator<A>,
    config: BoardConfig,
}

impl<A> BoardController<A>
where
    A: TaskBoardApi,
{
    /// Creates a controller issuing mutations through `mutator`.
    #[must_use]
    pub const fn new(mutator: OptimisticMutator<A>, config: BoardConfig) -> Self {
        Self { mutator, config }
    }

    /// Returns the underlying mutator.
    #[must_use]
    pub const fn mutator(&self) -> &OptimisticMutator<A> {
        &self.mutator
    }

    /// Partitions the store's current tasks into columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] when board state is poisoned.
    pub fn columns(&self) -> BoardResult<BoardColumns> {
        Ok(columns_of(self.mutator.store().tasks()?))
    }

    /// Handles a card dropped on `target_column`.
    ///
    /// Returns `Ok(None)` without writing or calling the remote API when the
    /// card is dropped on its own column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidColumn`] for an unknown column before
    /// any state change, or [`BoardError::NotFound`] for an unknown task.
    pub fn on_drop(
        &self,
        task_id: &TaskId,
        target_column: &str,
    ) -> BoardResult<Option<PendingMutation<A>>> {
        let target = parse_column(target_column)?;
        let task = self.task(task_id)?;
        if task.status() == target {
            debug!(%task_id, column = %target, "dropped on source column, ignoring");
            return Ok(None);
        }

        let request = MutationRequest::new(task_id.clone(), TaskMutation::SetStatus(target));
        self.mutator.apply(request).map(Some)
    }

    /// Handles a click on a card's priority badge, cycling
    /// `Low → Medium → High → Low`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] for an unknown task.
    pub fn on_priority_click(&self, task_id: &TaskId) -> BoardResult<PendingMutation<A>> {
        let task = self.task(task_id)?;
        let next = task.priority().cycled();
        let request = MutationRequest::new(task_id.clone(), TaskMutation::SetPriority(next));
        self.mutator.apply(request)
    }

    /// Edits a card's title and description.
    ///
    /// The edit is UI-local: it is written through the mutator but never sent
    /// to the remote API. Returns the edited task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] when the content violates the
    /// configured limits, or [`BoardError::NotFound`] for an unknown task.
    pub fn on_edit_task(
        &self,
        task_id: &TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> BoardResult<Task> {
        let new_title: String = title.into();
        let new_description: String = description.into();
        validate_content(&new_title, &new_description, &self.config)?;

        let request = MutationRequest::new(
            task_id.clone(),
            TaskMutation::EditContent {
                title: new_title,
                description: new_description,
            },
        );
        let pending = self.mutator.apply(request)?;
        debug_assert!(pending.remote_call().is_none());
        drop(pending);
        self.task(task_id)
    }

    fn task(&self, task_id: &TaskId) -> BoardResult<Task> {
        self.mutator
            .store()
            .get(task_id)?
            .ok_or_else(|| BoardError::NotFound(task_id.clone()))
    }
}

fn validate_content(
    title: &str,
    description: &str,
    config: &BoardConfig,
) -> Result<(), BoardDomainError> {
    if !config.allow_empty_title && title.trim().is_empty() {
        return Err(BoardDomainError::EmptyTitle);
    }
    check_length("title", title, config.max_title_length)?;
    check_length("description", description, config.max_description_length)
}

pub(crate) fn check_length(
    field: &'static str,
    value: &str,
    limit: usize,
) -> Result<(), BoardDomainError> {
    let actual = value.chars().count();
    if actual > limit {
        return Err(BoardDomainError::TextTooLong {
            field,
            limit,
            actual,
        });
    }
    Ok(())
}
