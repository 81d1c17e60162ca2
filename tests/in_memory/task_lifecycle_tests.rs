//! In-memory integration tests for the task lifecycle.

use super::helpers::App;
use chrono::TimeDelta;
use eyre::{Result, ensure};
use taskmaster::task::{
    domain::{
        NewSubmission, ReviewDecision, SubmissionKind, TaskResponse, TaskStatus, TimeLogKind,
    },
    ports::TaskRepository,
    services::TaskLifecycleErrorKind,
};

#[tokio::test(flavor = "multi_thread")]
async fn assignment_to_approval_round_trip() -> Result<()> {
    let app = App::start().await?;
    let alice = app.approved_intern("Alice").await?;
    let me = alice.as_caller();
    let task = app.assign("Document the billing API", &alice).await?;

    app.advance(TimeDelta::minutes(5));
    app.lifecycle.respond(&me, task.id(), TaskResponse::Accept).await?;
    app.advance(TimeDelta::minutes(5));
    app.lifecycle.start(&me, task.id()).await?;
    app.advance(TimeDelta::hours(2));
    app.lifecycle.pause(&me, task.id()).await?;
    app.advance(TimeDelta::minutes(30));
    app.lifecycle.resume(&me, task.id()).await?;
    app.advance(TimeDelta::hours(1));

    let credentials = app.uploads.issue_upload_credentials(&me, task.id()).await?;
    ensure!(credentials.folder == format!("taskmaster/submissions/{}", task.id()));
    ensure!(credentials.signature.len() == 64);

    let submitted = app
        .lifecycle
        .submit(
            &me,
            task.id(),
            vec![
                NewSubmission::link("https://docs.example.com/billing")?,
                NewSubmission::image("https://cdn.example.com/diagram.png")?,
            ],
        )
        .await?;
    ensure!(submitted.status() == TaskStatus::UnderReview);
    ensure!(!submitted.has_open_log());
    ensure!(
        submitted
            .submissions()
            .iter()
            .map(|entry| entry.kind())
            .collect::<Vec<_>>()
            == vec![SubmissionKind::Link, SubmissionKind::Image]
    );

    let completed = app
        .lifecycle
        .review(&app.admin, task.id(), ReviewDecision::Approve { feedback: None })
        .await?;
    ensure!(completed.status() == TaskStatus::Completed);

    let kinds: Vec<TimeLogKind> = completed.time_logs().iter().map(|log| log.kind()).collect();
    ensure!(kinds == vec![TimeLogKind::Work, TimeLogKind::Pause, TimeLogKind::Work]);

    let summary = app.performance.intern_summary(&me, alice.id()).await?;
    ensure!(summary.completed == 1);
    ensure!(summary.total_work_secs() == 3 * 60 * 60);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn silence_expires_the_window_and_reassignment_restarts_it() -> Result<()> {
    let app = App::start().await?;
    let bob = app.approved_intern("Bob").await?;
    let me = bob.as_caller();
    let task = app.assign("Triage bug backlog", &bob).await?;

    app.advance(TimeDelta::minutes(45));
    let countdown = app.lifecycle.response_countdown(&me, task.id()).await?;
    ensure!(countdown.status == TaskStatus::NoResponse);
    ensure!(countdown.remaining_secs() == 0);

    let late = app.lifecycle.respond(&me, task.id(), TaskResponse::Accept).await;
    ensure!(late.is_err_and(|err| err.kind() == TaskLifecycleErrorKind::InvalidTransition));

    let reassigned = app.lifecycle.reassign(&app.admin, task.id()).await?;
    ensure!(reassigned.status() == TaskStatus::Pending);
    ensure!(reassigned.title().as_str() == "Triage bug backlog (Reassigned)");

    app.advance(TimeDelta::minutes(20));
    let accepted = app.lifecycle.respond(&me, task.id(), TaskResponse::Accept).await?;
    ensure!(accepted.status() == TaskStatus::Accepted);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_work_is_resubmitted_directly() -> Result<()> {
    let app = App::start().await?;
    let cleo = app.approved_intern("Cleo").await?;
    let me = cleo.as_caller();
    let task = app.assign("Refactor CSV export", &cleo).await?;
    let deliverable = || NewSubmission::link("https://git.example.com/pr/7");

    app.lifecycle.respond(&me, task.id(), TaskResponse::Accept).await?;
    app.lifecycle.start(&me, task.id()).await?;
    app.advance(TimeDelta::hours(1));
    app.lifecycle.submit(&me, task.id(), vec![deliverable()?]).await?;

    let rejected = app
        .lifecycle
        .review(
            &app.admin,
            task.id(),
            ReviewDecision::Reject {
                feedback: "  Missing tests  ".to_owned(),
            },
        )
        .await?;
    ensure!(rejected.status() == TaskStatus::Rejected);
    ensure!(rejected.review_feedback() == Some("Missing tests"));

    let restart = app.lifecycle.start(&me, task.id()).await;
    ensure!(restart.is_err_and(|err| err.kind() == TaskLifecycleErrorKind::InvalidTransition));
    app.advance(TimeDelta::minutes(30));
    let resubmitted = app.lifecycle.submit(&me, task.id(), vec![deliverable()?]).await?;
    ensure!(resubmitted.status() == TaskStatus::UnderReview);
    ensure!(resubmitted.submissions().len() == 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn interns_only_see_their_own_tasks() -> Result<()> {
    let app = App::start().await?;
    let dana = app.approved_intern("Dana").await?;
    let eli = app.approved_intern("Eli").await?;
    let first = app.assign("Write release notes", &dana).await?;
    app.advance(TimeDelta::minutes(1));
    let second = app.assign("Update changelog", &dana).await?;
    app.assign("Review translations", &eli).await?;

    let listed: Vec<_> = app
        .lifecycle
        .list_tasks_for_intern(&dana.as_caller(), dana.id())
        .await?
        .iter()
        .map(|task| task.id())
        .collect();
    ensure!(listed == vec![second.id(), first.id()]);

    let peek = app
        .lifecycle
        .list_tasks_for_intern(&eli.as_caller(), dana.id())
        .await;
    ensure!(peek.is_err_and(|err| err.is_forbidden()));

    let all = app.lifecycle.list_all_tasks(&app.admin).await?;
    ensure!(all.len() == 3);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn declined_tasks_are_terminal() -> Result<()> {
    let app = App::start().await?;
    let finn = app.approved_intern("Finn").await?;
    let me = finn.as_caller();
    let task = app.assign("Organise offsite", &finn).await?;

    let declined = app
        .lifecycle
        .respond(
            &me,
            task.id(),
            TaskResponse::Decline {
                reason: "Out of office that week".to_owned(),
            },
        )
        .await?;
    ensure!(declined.decline_reason() == Some("Out of office that week"));

    let start = app.lifecycle.start(&me, task.id()).await;
    ensure!(start.is_err_and(|err| err.kind() == TaskLifecycleErrorKind::InvalidTransition));
    let reassign = app.lifecycle.reassign(&app.admin, task.id()).await;
    ensure!(reassign.is_err());

    let summary = app.lifecycle.dashboard_summary(&app.admin).await?;
    ensure!(summary.count(TaskStatus::Declined) == 1);
    ensure!(app.tasks.list_all().await?.len() == 1);
    Ok(())
}
