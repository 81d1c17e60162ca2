//! Then steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use rstest_bdd_macros::then;
use taskmaster::task::{domain::TaskStatus, services::TaskLifecycleErrorKind};

fn last_error_kind(world: &TaskLifecycleWorld) -> Result<TaskLifecycleErrorKind, eyre::Report> {
    match world.last_result.as_ref() {
        Some(Err(err)) => Ok(err.kind()),
        Some(Ok(task)) => Err(eyre::eyre!(
            "expected a failure, task is {}",
            task.status().as_str()
        )),
        None => Err(eyre::eyre!("no operation was attempted")),
    }
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let admin = world.admin()?;
    let task_id = world.task()?.id();
    let stored = run_async(world.service.find_task(&admin, task_id))?;

    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            stored.status().as_str()
        ));
    }
    Ok(())
}

#[then("the response fails because the window expired")]
fn response_window_expired(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let kind = last_error_kind(world)?;
    if kind != TaskLifecycleErrorKind::ExpiredWindow {
        return Err(eyre::eyre!("expected an expired window, got {kind:?}"));
    }
    Ok(())
}

#[then("the response fails validation")]
fn response_fails_validation(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let kind = last_error_kind(world)?;
    if kind != TaskLifecycleErrorKind::Validation {
        return Err(eyre::eyre!("expected a validation failure, got {kind:?}"));
    }
    Ok(())
}

#[then(r#"the task title ends with "{marker}""#)]
fn task_title_ends_with(world: &TaskLifecycleWorld, marker: String) -> Result<(), eyre::Report> {
    let title = world.task()?.title().as_str();
    if !title.ends_with(&marker) {
        return Err(eyre::eyre!("title {title:?} lacks {marker:?}"));
    }
    Ok(())
}
