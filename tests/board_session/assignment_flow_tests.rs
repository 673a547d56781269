//! Detail view to assignment dialog flows through a mounted session.

use super::helpers::{fixture_api, mount, task_id, user_id};
use chrono::NaiveDate;
use esg_taskboard::board::{
    domain::{AssignmentPayload, AssignmentType, RemoteCall},
    services::{AssignmentWorkflowError, BoardError, Dialog, MutationOutcome, WorkflowState},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recurring_assignment_from_detail_view_commits_and_closes_dialogs() {
    let api = fixture_api();
    let mut session = mount(&api).await;

    let users = session.users().clone();

    let view = session.open_task_detail(&task_id("7")).expect("open detail");
    assert!(view.assignee.is_none());
    let workflow = session.assign_from_detail().expect("delegate");
    workflow
        .select_user(&users, user_id("42"))
        .expect("select");
    workflow.next().expect("next");
    workflow
        .set_assignment_type(AssignmentType::Recurring)
        .expect("type");
    workflow.set_monthly_due_day("15").expect("day");
    workflow.set_notes("Quarterly close").expect("notes");

    let outcome = session.submit_assignment().await.expect("submit");

    assert_eq!(outcome, MutationOutcome::Committed);
    assert!(session.assignment().is_none());
    assert!(session.details().navigation().is_empty());
    assert_eq!(
        api.calls().expect("calls"),
        vec![RemoteCall::PersistAssignment(AssignmentPayload {
            task_disclosure_id: task_id("7"),
            assigned_to: user_id("42"),
            due_date: NaiveDate::from_ymd_opt(2026, 10, 15).expect("valid date"),
            recurring: true,
            notes: "Quarterly close".to_owned(),
        })]
    );
    let task = session
        .store()
        .get(&task_id("7"))
        .expect("read")
        .expect("task 7");
    assert_eq!(task.assigned_to(), Some(&user_id("42")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_assignment_keeps_dialog_open_with_alert() {
    let api = fixture_api();
    let mut session = mount(&api).await;
    let users = session.users().clone();
    api.fail_next_write("assignee on leave").expect("inject failure");

    let workflow = session.open_assignment(&task_id("12")).expect("open");
    workflow.select_user(&users, user_id("43")).expect("select");
    workflow.next().expect("next");
    workflow
        .set_due_date(NaiveDate::from_ymd_opt(2026, 11, 30))
        .expect("due date");

    let outcome = session.submit_assignment().await.expect("submit");

    assert!(matches!(outcome, MutationOutcome::RolledBack(_)));
    let workflow = session.assignment().expect("dialog still open");
    assert_eq!(workflow.state(), WorkflowState::AssignmentDetails);
    assert!(
        workflow
            .alert()
            .is_some_and(|alert| alert.starts_with("Failed to assign task"))
    );
    let task = session
        .store()
        .get(&task_id("12"))
        .expect("read")
        .expect("task 12");
    assert_eq!(task.assigned_to(), Some(&user_id("42")));
    assert_eq!(task.due_date(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelling_delegated_assignment_returns_to_detail_view() {
    let api = fixture_api();
    let mut session = mount(&api).await;
    session.open_task_detail(&task_id("3")).expect("open detail");
    session.assign_from_detail().expect("delegate");

    session.cancel_assignment();

    assert!(session.assignment().is_none());
    assert_eq!(
        session.details().navigation().top(),
        Some(&Dialog::TaskDetail(task_id("3")))
    );
    let view = session
        .details()
        .current_view(session.users())
        .expect("view")
        .expect("detail visible");
    assert_eq!(
        view.assignee.map(|user| user.name),
        Some("Ali Rahman".to_owned())
    );
    assert!(api.calls().expect("calls").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn submit_without_open_dialog_is_rejected() {
    let api = fixture_api();
    let mut session = mount(&api).await;

    let result = session.submit_assignment().await;

    assert!(matches!(
        result,
        Err(AssignmentWorkflowError::Board(BoardError::NoAssignmentOpen))
    ));
}
