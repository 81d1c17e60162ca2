//! Given steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use crate::test_helpers::epoch;
use chrono::TimeDelta;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskmaster::task::services::{CreateTaskRequest, TaskAssignee};

#[given(r#"an approved intern named "{name}""#)]
fn approved_intern(world: &mut TaskLifecycleWorld, name: String) -> Result<(), eyre::Report> {
    let admin = run_async(world.directory.create_admin("Grace", "grace@example.com"))
        .wrap_err("create administrator")?;
    let email = format!("{}@example.com", name.to_ascii_lowercase());
    let registered =
        run_async(world.directory.register_intern(name, email)).wrap_err("register intern")?;
    let approved = run_async(world.directory.approve(&admin.as_caller(), registered.id()))
        .wrap_err("approve intern")?;

    world.admin = Some(admin.as_caller());
    world.intern = Some(approved);
    Ok(())
}

#[given(r#"the administrator assigned "{title}" to the intern"#)]
fn administrator_assigned(
    world: &mut TaskLifecycleWorld,
    title: String,
) -> Result<(), eyre::Report> {
    let intern_id = world.intern_caller()?.user_id();
    let request = CreateTaskRequest::new(
        title,
        epoch() + TimeDelta::days(1),
        TaskAssignee::Intern(intern_id),
    );
    let created = run_async(world.service.create_task(&world.admin()?, request))
        .wrap_err("assign task")?;
    world.task = created.into_iter().next();
    Ok(())
}
