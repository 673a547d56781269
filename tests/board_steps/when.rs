//! When steps for task board BDD scenarios.

use super::world::{BoardWorld, run_async, user_id};
use esg_taskboard::board::domain::{AssignmentType, TaskId};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"task "{id}" is dropped on column "{column}""#)]
fn drop_task(world: &mut BoardWorld, id: String, column: String) -> Result<(), eyre::Report> {
    let task_id = TaskId::new(id.as_str())?;
    let pending = world
        .session()?
        .board()
        .on_drop(&task_id, &column)
        .wrap_err("drop card")?;
    world.last_outcome = match pending {
        Some(pending) => Some(run_async(pending.settle())?),
        None => None,
    };
    Ok(())
}

#[when(r#"the priority badge of task "{id}" is clicked {times:u32} times"#)]
fn click_priority(world: &mut BoardWorld, id: String, times: u32) -> Result<(), eyre::Report> {
    let task_id = TaskId::new(id.as_str())?;
    for _ in 0..times {
        let pending = world.session()?.board().on_priority_click(&task_id)?;
        world.last_outcome = Some(run_async(pending.settle())?);
    }
    Ok(())
}

#[when(r#"the detail view of task "{id}" is opened"#)]
fn open_detail(world: &mut BoardWorld, id: String) -> Result<(), eyre::Report> {
    let task_id = TaskId::new(id.as_str())?;
    world
        .session_mut()?
        .open_task_detail(&task_id)
        .wrap_err("open detail view")?;
    Ok(())
}

#[when(r#"the task is delegated to user "{user}""#)]
fn delegate_to_user(world: &mut BoardWorld, user: String) -> Result<(), eyre::Report> {
    let session = world.session_mut()?;
    let users = session.users().clone();
    let workflow = session.assign_from_detail()?;
    workflow.select_user(&users, user_id(&user)?)?;
    workflow.next()?;
    Ok(())
}

#[when(r#"a recurring due day of "{day}" is entered"#)]
fn enter_recurring_day(world: &mut BoardWorld, day: String) -> Result<(), eyre::Report> {
    let workflow = world
        .session_mut()?
        .assignment_mut()
        .ok_or_else(|| eyre::eyre!("assignment dialog not open"))?;
    workflow.set_assignment_type(AssignmentType::Recurring)?;
    workflow.set_monthly_due_day(day)?;
    Ok(())
}

#[when("the assignment is submitted")]
fn submit_assignment(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    let outcome = run_async(world.session_mut()?.submit_assignment())
        .wrap_err("submit assignment")?;
    world.last_outcome = Some(outcome);
    Ok(())
}
