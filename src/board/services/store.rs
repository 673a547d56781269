//! In-memory task store shared by board services.

use crate::board::domain::{FieldSnapshot, Task, TaskId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Errors raised by the task store and in-flight bookkeeping.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskStoreError {
    /// A lock was poisoned by a panicking writer.
    #[error("board state lock poisoned: {0}")]
    Poisoned(String),
}

impl TaskStoreError {
    pub(crate) fn poisoned(err: impl ToString) -> Self {
        Self::Poisoned(err.to_string())
    }
}

/// Single source of truth for the tasks shown on a board.
///
/// Clones share the same underlying state. Reads are public; writes are
/// restricted to the optimistic mutator so that every change can be rolled
/// back field by field.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    state: Arc<RwLock<TaskStoreState>>,
}

#[derive(Debug, Default)]
struct TaskStoreState {
    order: Vec<TaskId>,
    tasks: HashMap<TaskId, Task>,
    revision: u64,
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the fetched tasks in fetch order.
    ///
    /// A task id appearing twice keeps its first position and last value.
    #[must_use]
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut state = TaskStoreState::default();
        for task in tasks {
            if !state.tasks.contains_key(task.id()) {
                state.order.push(task.id().clone());
            }
            state.tasks.insert(task.id().clone(), task);
        }
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    fn read(&self) -> TaskStoreResult<RwLockReadGuard<'_, TaskStoreState>> {
        self.state.read().map_err(TaskStoreError::poisoned)
    }

    fn write(&self) -> TaskStoreResult<RwLockWriteGuard<'_, TaskStoreState>> {
        self.state.write().map_err(TaskStoreError::poisoned)
    }

    /// Returns a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Poisoned`] when the lock is poisoned.
    pub fn get(&self, task_id: &TaskId) -> TaskStoreResult<Option<Task>> {
        Ok(self.read()?.tasks.get(task_id).cloned())
    }

    /// Returns every task in fetch order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Poisoned`] when the lock is poisoned.
    pub fn tasks(&self) -> TaskStoreResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.tasks.get(id).cloned())
            .collect())
    }

    /// Returns the number of tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Poisoned`] when the lock is poisoned.
    pub fn len(&self) -> TaskStoreResult<usize> {
        Ok(self.read()?.tasks.len())
    }

    /// Returns `true` when the store holds no tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Poisoned`] when the lock is poisoned.
    pub fn is_empty(&self) -> TaskStoreResult<bool> {
        Ok(self.read()?.tasks.is_empty())
    }

    /// Returns the write counter, bumped by every field write.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Poisoned`] when the lock is poisoned.
    pub fn revision(&self) -> TaskStoreResult<u64> {
        Ok(self.read()?.revision)
    }

    /// Writes one field group of a task.
    ///
    /// Returns `false` without writing when the task is absent.
    pub(crate) fn write_field(
        &self,
        task_id: &TaskId,
        snapshot: FieldSnapshot,
    ) -> TaskStoreResult<bool> {
        let mut state = self.write()?;
        let Some(task) = state.tasks.get_mut(task_id) else {
            return Ok(false);
        };
        task.restore(snapshot);
        state.revision = state.revision.wrapping_add(1);
        Ok(true)
    }
}
