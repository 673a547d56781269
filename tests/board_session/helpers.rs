//! Shared fixtures for board session integration tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use esg_taskboard::{
    board::{
        adapters::memory::InMemoryTaskBoardApi,
        domain::{ReportId, TaskId, UserId},
        services::{BoardConfig, BoardSession},
    },
    telemetry,
};
use mockable::Clock;

/// Session type used throughout the integration tests.
pub type TestSession = BoardSession<InMemoryTaskBoardApi, FixedClock>;

/// Report seeded by [`FIXTURE_JSON`].
pub const REPORT_ID: &str = "esg-2026";

/// Server-side state of a small sustainability report.
pub const FIXTURE_JSON: &str = r#"{
    "report_id": "esg-2026",
    "tasks": [
        {
            "id": "7",
            "status": "pending",
            "priority": "low",
            "due_date": null,
            "assigned_to": null,
            "title": "Scope 1 emissions",
            "description": "Direct emissions from owned sources"
        },
        {
            "id": "3",
            "status": "completed",
            "priority": "medium",
            "due_date": "2026-09-30",
            "assigned_to": "43",
            "title": "Board diversity",
            "description": ""
        },
        {
            "id": "12",
            "status": "in_progress",
            "priority": "high",
            "due_date": null,
            "assigned_to": "42",
            "title": "Water withdrawal",
            "description": "Withdrawal by source"
        }
    ],
    "users": [
        {
            "id": "42",
            "name": "Noor Haddad",
            "department": "Sustainability",
            "email": "noor@example.com"
        },
        {
            "id": "43",
            "name": "Ali Rahman",
            "department": "Finance",
            "email": "ali@example.com"
        }
    ]
}"#;

/// Clock pinned to 2026-10-17.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl Default for FixedClock {
    fn default() -> Self {
        Self(
            Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0)
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

/// Builds the in-memory API from [`FIXTURE_JSON`].
pub fn fixture_api() -> Arc<InMemoryTaskBoardApi> {
    telemetry::init_tracing_once();
    Arc::new(InMemoryTaskBoardApi::from_json(FIXTURE_JSON).expect("valid fixture"))
}

/// Mounts the fixture report against `api`.
pub async fn mount(api: &Arc<InMemoryTaskBoardApi>) -> TestSession {
    BoardSession::mount(
        Arc::clone(api),
        Arc::new(FixedClock::default()),
        BoardConfig::default(),
        report_id(),
    )
    .await
    .expect("mount fixture board")
}

/// Parses a report identifier.
pub fn report_id() -> ReportId {
    ReportId::new(REPORT_ID).expect("valid report id")
}

/// Parses a task identifier.
pub fn task_id(raw: &str) -> TaskId {
    TaskId::new(raw).expect("valid task id")
}

/// Parses a user identifier.
pub fn user_id(raw: &str) -> UserId {
    UserId::new(raw).expect("valid user id")
}
