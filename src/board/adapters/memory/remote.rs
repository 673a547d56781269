//! In-memory stand-in for the remote reporting API.

use crate::board::{
    domain::{
        AssignmentPayload, Priority, RemoteCall, ReportId, Task, TaskId, TaskStatus, User,
    },
    ports::{RemoteError, RemoteResult, TaskBoardApi},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Seed data for one report board, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardFixture {
    /// Report the tasks belong to.
    pub report_id: ReportId,
    /// Server-side tasks.
    pub tasks: Vec<Task>,
    /// Internal users.
    #[serde(default)]
    pub users: Vec<User>,
}

/// Thread-safe in-memory remote API.
///
/// Holds the server-confirmed copy of every task, records each write call
/// in order, and can be told to reject writes so rollback paths are
/// observable in tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskBoardApi {
    state: Arc<RwLock<InMemoryApiState>>,
}

#[derive(Debug, Default)]
struct InMemoryApiState {
    reports: HashMap<ReportId, Vec<TaskId>>,
    tasks: HashMap<TaskId, Task>,
    users: Vec<User>,
    calls: Vec<RemoteCall>,
    task_failures: HashMap<TaskId, String>,
    next_write_failure: Option<String>,
    fetch_failure: Option<String>,
}

impl InMemoryApiState {
    fn take_write_failure(&mut self, task_id: &TaskId) -> Option<String> {
        self.next_write_failure
            .take()
            .or_else(|| self.task_failures.get(task_id).cloned())
    }
}

fn lock_error(err: impl ToString) -> RemoteError {
    RemoteError::transport(std::io::Error::other(err.to_string()))
}

impl InMemoryTaskBoardApi {
    /// Creates an empty API.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an API seeded from a fixture.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn from_fixture(fixture: BoardFixture) -> RemoteResult<Self> {
        let api = Self::new();
        api.seed_report(fixture.report_id, fixture.tasks)?;
        api.seed_users(fixture.users)?;
        Ok(api)
    }

    /// Creates an API from a JSON [`BoardFixture`].
    ///
    /// # Errors
    ///
    /// Returns a transport error when the JSON is malformed.
    pub fn from_json(json: &str) -> RemoteResult<Self> {
        let fixture: BoardFixture = serde_json::from_str(json).map_err(RemoteError::transport)?;
        Self::from_fixture(fixture)
    }

    fn read(&self) -> RemoteResult<RwLockReadGuard<'_, InMemoryApiState>> {
        self.state.read().map_err(lock_error)
    }

    fn write(&self) -> RemoteResult<RwLockWriteGuard<'_, InMemoryApiState>> {
        self.state.write().map_err(lock_error)
    }

    /// Registers the tasks of a report, replacing any previous list.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn seed_report(
        &self,
        report_id: ReportId,
        tasks: impl IntoIterator<Item = Task>,
    ) -> RemoteResult<()> {
        let mut state = self.write()?;
        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.id().clone());
            state.tasks.insert(task.id().clone(), task);
        }
        state.reports.insert(report_id, ids);
        Ok(())
    }

    /// Replaces the internal user list.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn seed_users(&self, users: impl IntoIterator<Item = User>) -> RemoteResult<()> {
        self.write()?.users = users.into_iter().collect();
        Ok(())
    }

    /// Rejects every write for `task_id` until cleared.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn fail_writes_for(&self, task_id: TaskId, reason: impl Into<String>) -> RemoteResult<()> {
        self.write()?.task_failures.insert(task_id, reason.into());
        Ok(())
    }

    /// Rejects the next write, whatever its target.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn fail_next_write(&self, reason: impl Into<String>) -> RemoteResult<()> {
        self.write()?.next_write_failure = Some(reason.into());
        Ok(())
    }

    /// Rejects both bulk fetches until cleared.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn fail_fetches(&self, reason: impl Into<String>) -> RemoteResult<()> {
        self.write()?.fetch_failure = Some(reason.into());
        Ok(())
    }

    /// Clears all injected failures.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn clear_failures(&self) -> RemoteResult<()> {
        let mut state = self.write()?;
        state.task_failures.clear();
        state.next_write_failure = None;
        state.fetch_failure = None;
        Ok(())
    }

    /// Returns the write calls received so far, in arrival order.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn calls(&self) -> RemoteResult<Vec<RemoteCall>> {
        Ok(self.read()?.calls.clone())
    }

    /// Returns the server-confirmed copy of a task.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn server_task(&self, task_id: &TaskId) -> RemoteResult<Option<Task>> {
        Ok(self.read()?.tasks.get(task_id).cloned())
    }
}

#[async_trait]
impl TaskBoardApi for InMemoryTaskBoardApi {
    async fn fetch_tasks(&self, report_id: &ReportId) -> RemoteResult<Vec<Task>> {
        let state = self.read()?;
        if let Some(reason) = &state.fetch_failure {
            return Err(RemoteError::rejected(reason.clone()));
        }
        let tasks = state
            .reports
            .get(report_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.tasks.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(tasks)
    }

    async fn fetch_internal_users(&self) -> RemoteResult<Vec<User>> {
        let state = self.read()?;
        if let Some(reason) = &state.fetch_failure {
            return Err(RemoteError::rejected(reason.clone()));
        }
        Ok(state.users.clone())
    }

    async fn persist_task_status(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
        priority: Priority,
    ) -> RemoteResult<()> {
        let mut state = self.write()?;
        state.calls.push(RemoteCall::PersistTaskStatus {
            task_id: task_id.clone(),
            status,
            priority,
        });
        if let Some(reason) = state.take_write_failure(task_id) {
            return Err(RemoteError::rejected(reason));
        }
        let task = state
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| RemoteError::rejected(format!("unknown task {task_id}")))?;
        *task = task.clone().with_status(status).with_priority(priority);
        Ok(())
    }

    async fn persist_assignment(&self, payload: &AssignmentPayload) -> RemoteResult<()> {
        let mut state = self.write()?;
        state
            .calls
            .push(RemoteCall::PersistAssignment(payload.clone()));
        if let Some(reason) = state.take_write_failure(&payload.task_disclosure_id) {
            return Err(RemoteError::rejected(reason));
        }
        let task = state
            .tasks
            .get_mut(&payload.task_disclosure_id)
            .ok_or_else(|| {
                RemoteError::rejected(format!("unknown task {}", payload.task_disclosure_id))
            })?;
        *task = task
            .clone()
            .with_assignment(payload.assigned_to.clone(), Some(payload.due_date));
        Ok(())
    }
}
