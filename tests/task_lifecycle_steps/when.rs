//! When steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use chrono::TimeDelta;
use rstest_bdd_macros::when;
use taskmaster::task::domain::{NewSubmission, ReviewDecision, TaskResponse};

#[when("{minutes:i64} minutes pass")]
fn minutes_pass(world: &mut TaskLifecycleWorld, minutes: i64) {
    world.clock.advance(TimeDelta::minutes(minutes));
}

fn respond(world: &mut TaskLifecycleWorld, response: TaskResponse) -> Result<(), eyre::Report> {
    let caller = world.intern_caller()?;
    let task_id = world.task()?.id();
    let result = run_async(world.service.respond(&caller, task_id, response));
    world.record(result);
    Ok(())
}

#[when("the intern accepts the task")]
fn intern_accepts(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    respond(world, TaskResponse::Accept)
}

#[when(r#"the intern declines the task with reason "{reason}""#)]
fn intern_declines(world: &mut TaskLifecycleWorld, reason: String) -> Result<(), eyre::Report> {
    respond(world, TaskResponse::Decline { reason })
}

#[when("the intern starts work")]
fn intern_starts(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let caller = world.intern_caller()?;
    let task_id = world.task()?.id();
    let result = run_async(world.service.start(&caller, task_id));
    world.record(result);
    Ok(())
}

#[when(r#"the intern submits "{url}""#)]
fn intern_submits(world: &mut TaskLifecycleWorld, url: String) -> Result<(), eyre::Report> {
    let caller = world.intern_caller()?;
    let task_id = world.task()?.id();
    let entries = vec![NewSubmission::link(url)?];
    let result = run_async(world.service.submit(&caller, task_id, entries));
    world.record(result);
    Ok(())
}

#[when("the administrator approves the task")]
fn administrator_approves(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let admin = world.admin()?;
    let task_id = world.task()?.id();
    let decision = ReviewDecision::Approve { feedback: None };
    let result = run_async(world.service.review(&admin, task_id, decision));
    world.record(result);
    Ok(())
}

#[when("the administrator reassigns the task")]
fn administrator_reassigns(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let admin = world.admin()?;
    let task_id = world.task()?.id();
    let result = run_async(world.service.reassign(&admin, task_id));
    world.record(result);
    Ok(())
}
