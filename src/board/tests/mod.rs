//! Unit tests for the board module.
//!
//! Tests are organised by component, covering happy paths, rollback and
//! guard paths, and the interleavings of in-flight remote writes.


use crate::board::{
    adapters::memory::InMemoryTaskBoardApi,
    domain::{
        AssignmentPayload, Priority, ReportId, Task, TaskId, TaskStatus, User, UserId,
    },
    ports::{RemoteResult, TaskBoardApi},
    services::{OptimisticMutator, TaskStore},
};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub(super) struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub(super) fn at(year: i32, month: u32, day: u32) -> Self {
        Self(
            Utc.with_ymd_and_hms(year, month, day, 9, 30, 0)
                .single()
                .expect("valid fixed instant"),
        )
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(super) fn task_id(raw: &str) -> TaskId {
    TaskId::new(raw).expect("valid task id")
}

pub(super) fn user_id(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}

pub(super) fn report_id() -> ReportId {
    ReportId::new("esg-2026").expect("valid report id")
}

pub(super) fn task(raw_id: &str, status: TaskStatus, priority: Priority) -> Task {
    Task::new(task_id(raw_id), format!("Disclosure {raw_id}"))
        .with_status(status)
        .with_priority(priority)
}

pub(super) fn users() -> Vec<User> {
    vec![
        User::new(user_id("42"), "Noor Haddad", "Sustainability", "noor@example.com"),
        User::new(user_id("43"), "Ali Rahman", "Finance", "ali@example.com"),
    ]
}

/// Builds an in-memory API and a mutator over a store holding `tasks`.
pub(super) fn seeded(
    tasks: Vec<Task>,
) -> (Arc<InMemoryTaskBoardApi>, OptimisticMutator<InMemoryTaskBoardApi>) {
    let api = Arc::new(InMemoryTaskBoardApi::new());
    api.seed_report(report_id(), tasks.clone())
        .expect("seed report");
    api.seed_users(users()).expect("seed users");
    let mutator = OptimisticMutator::new(TaskStore::from_tasks(tasks), Arc::clone(&api));
    (api, mutator)
}

/// API whose writes wait until the gate is opened.
#[derive(Debug, Default)]
pub(super) struct GatedApi {
    pub(super) inner: InMemoryTaskBoardApi,
    open: AtomicBool,
}

impl GatedApi {
    pub(super) fn new(inner: InMemoryTaskBoardApi) -> Self {
        Self {
            inner,
            open: AtomicBool::new(false),
        }
    }

    pub(super) fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
    }

    async fn wait(&self) {
        while !self.open.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl TaskBoardApi for GatedApi {
    async fn fetch_tasks(&self, report_id: &ReportId) -> RemoteResult<Vec<Task>> {
        self.inner.fetch_tasks(report_id).await
    }

    async fn fetch_internal_users(&self) -> RemoteResult<Vec<User>> {
        self.inner.fetch_internal_users().await
    }

    async fn persist_task_status(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
        priority: Priority,
    ) -> RemoteResult<()> {
        self.wait().await;
        self.inner
            .persist_task_status(task_id, status, priority)
            .await
    }

    async fn persist_assignment(&self, payload: &AssignmentPayload) -> RemoteResult<()> {
        self.wait().await;
        self.inner.persist_assignment(payload).await
    }
}
