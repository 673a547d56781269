//! Then steps for task board BDD scenarios.

use super::world::{BoardWorld, user_id};
use esg_taskboard::board::{
    domain::{Priority, TaskId, parse_column},
    services::MutationOutcome,
};
use rstest_bdd_macros::then;

#[then(r#"task "{id}" is in column "{column}""#)]
fn task_in_column(world: &BoardWorld, id: String, column: String) -> Result<(), eyre::Report> {
    let expected = parse_column(&column)?;
    let columns = world.session()?.board().columns()?;
    let found = columns.locate(&TaskId::new(id.as_str())?);
    eyre::ensure!(
        found == Some(expected),
        "expected task {id} in {expected}, found {found:?}"
    );
    Ok(())
}

#[then(r#"task "{id}" has "{priority}" priority"#)]
fn task_has_priority(world: &BoardWorld, id: String, priority: String) -> Result<(), eyre::Report> {
    let expected = Priority::try_from(priority.as_str())?;
    let task = world.task(&id)?;
    eyre::ensure!(
        task.priority() == expected,
        "expected {} priority, found {}",
        expected.as_str(),
        task.priority().as_str()
    );
    Ok(())
}

#[then("the server recorded {count:usize} write")]
fn server_recorded_one_write(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    ensure_write_count(world, count)
}

#[then("the server recorded {count:usize} writes")]
fn server_recorded_writes(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    ensure_write_count(world, count)
}

fn ensure_write_count(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let calls = world.api.calls()?;
    eyre::ensure!(
        calls.len() == count,
        "expected {count} remote writes, found {}",
        calls.len()
    );
    Ok(())
}

#[then("the last mutation was rolled back")]
fn last_mutation_rolled_back(world: &BoardWorld) -> Result<(), eyre::Report> {
    let outcome = world
        .last_outcome
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no mutation settled in scenario"))?;
    eyre::ensure!(
        matches!(outcome, MutationOutcome::RolledBack(_)),
        "expected rollback, got {outcome:?}"
    );
    Ok(())
}

#[then(r#"task "{id}" is assigned to user "{user}" due on "{date}""#)]
fn task_assigned(
    world: &BoardWorld,
    id: String,
    user: String,
    date: String,
) -> Result<(), eyre::Report> {
    let task = world.task(&id)?;
    let expected_user = user_id(&user)?;
    eyre::ensure!(
        task.assigned_to() == Some(&expected_user),
        "expected assignee {user}, found {:?}",
        task.assigned_to()
    );
    let due = task.due_date().map(|due| due.to_string());
    eyre::ensure!(
        due.as_deref() == Some(date.as_str()),
        "expected due date {date}, found {due:?}"
    );
    Ok(())
}

#[then(r#"task "{id}" is unassigned"#)]
fn task_unassigned(world: &BoardWorld, id: String) -> Result<(), eyre::Report> {
    let task = world.task(&id)?;
    eyre::ensure!(
        task.assigned_to().is_none() && task.due_date().is_none(),
        "expected task {id} to be unassigned"
    );
    Ok(())
}

#[then("no dialog is open")]
fn no_dialog_open(world: &BoardWorld) -> Result<(), eyre::Report> {
    let session = world.session()?;
    eyre::ensure!(
        session.assignment().is_none() && session.details().navigation().is_empty(),
        "expected every dialog to be closed"
    );
    Ok(())
}

#[then("the assignment dialog shows an alert")]
fn assignment_alert_shown(world: &BoardWorld) -> Result<(), eyre::Report> {
    let workflow = world
        .session()?
        .assignment()
        .ok_or_else(|| eyre::eyre!("assignment dialog closed"))?;
    let alert = workflow
        .alert()
        .ok_or_else(|| eyre::eyre!("no alert raised"))?;
    eyre::ensure!(
        alert.starts_with("Failed to assign task"),
        "unexpected alert: {alert}"
    );
    Ok(())
}
