//! Closing a board while remote writes are outstanding.

use super::helpers::{fixture_api, mount, task_id};
use esg_taskboard::board::{domain::TaskStatus, services::MutationOutcome};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn results_arriving_after_close_are_dead_lettered() {
    let api = fixture_api();
    let session = mount(&api).await;
    let store = session.store().clone();
    let pending = session
        .board()
        .on_drop(&task_id("7"), "completed")
        .expect("drop")
        .expect("status change");

    session.close().expect("close");
    let outcome = pending.settle().await.expect("settle");

    assert_eq!(outcome, MutationOutcome::DeadLettered);
    assert_eq!(api.calls().expect("calls").len(), 1);
    let task = store.get(&task_id("7")).expect("read").expect("task 7");
    assert_eq!(task.status(), TaskStatus::Completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failures_after_close_do_not_roll_back() {
    let api = fixture_api();
    let session = mount(&api).await;
    let store = session.store().clone();
    api.fail_writes_for(task_id("3"), "locked").expect("inject failure");
    let pending = session
        .board()
        .on_priority_click(&task_id("3"))
        .expect("click");

    session.close().expect("close");
    let outcome = pending.settle().await.expect("settle");

    assert_eq!(outcome, MutationOutcome::DeadLettered);
    let task = store.get(&task_id("3")).expect("read").expect("task 3");
    assert_eq!(task.priority(), esg_taskboard::board::domain::Priority::High);
}
