//! Mount tests for the board session.

use std::sync::Arc;

use super::helpers::{FixedClock, fixture_api, mount, report_id, task_id};
use esg_taskboard::board::{
    adapters::memory::InMemoryTaskBoardApi,
    domain::{Priority, ReportId, TaskStatus},
    ports::RemoteError,
    services::{BoardConfig, BoardError, BoardSession},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mount_loads_every_task_into_its_column() {
    let api = fixture_api();

    let session = mount(&api).await;
    let columns = session.board().columns().expect("columns");

    assert_eq!(session.report_id(), &report_id());
    assert_eq!(session.store().len().expect("len"), 3);
    assert_eq!(columns.locate(&task_id("7")), Some(TaskStatus::Pending));
    assert_eq!(columns.locate(&task_id("12")), Some(TaskStatus::InProgress));
    assert_eq!(columns.locate(&task_id("3")), Some(TaskStatus::Completed));
    assert_eq!(session.users().len(), 2);
    assert!(api.calls().expect("calls").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mount_preserves_fetched_fields() {
    let api = fixture_api();

    let session = mount(&api).await;
    let task = session
        .store()
        .get(&task_id("3"))
        .expect("read")
        .expect("task 3");

    assert_eq!(task.priority(), Priority::Medium);
    assert_eq!(task.title(), "Board diversity");
    assert_eq!(
        task.due_date().map(|date| date.to_string()),
        Some("2026-09-30".to_owned())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mount_of_unknown_report_yields_empty_board() {
    let api = fixture_api();

    let session = BoardSession::mount(
        Arc::clone(&api),
        Arc::new(FixedClock::default()),
        BoardConfig::default(),
        ReportId::new("esg-2019").expect("valid report id"),
    )
    .await
    .expect("mount");

    assert!(session.store().is_empty().expect("is_empty"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mount_surfaces_fetch_failure() {
    let api = fixture_api();
    api.fail_fetches("reporting service unavailable")
        .expect("inject failure");

    let result = BoardSession::mount(
        Arc::clone(&api),
        Arc::new(FixedClock::default()),
        BoardConfig::default(),
        report_id(),
    )
    .await;

    assert!(matches!(
        result,
        Err(BoardError::Remote(RemoteError::Rejected(_)))
    ));
}

#[rstest]
fn malformed_fixture_is_rejected() {
    let result = InMemoryTaskBoardApi::from_json(r#"{"report_id": ""}"#);

    assert!(matches!(result, Err(RemoteError::Transport(_))));
}
