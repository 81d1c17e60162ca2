//! In-memory integration tests for leaderboards and intern summaries.

use super::helpers::App;
use chrono::TimeDelta;
use eyre::{Result, bail, ensure};
use taskmaster::{
    intern::domain::User,
    performance::services::PerformanceServiceError,
    task::domain::{NewSubmission, ReviewDecision, TaskResponse},
};

/// Accepts, works on, and gets approval for a fresh task.
async fn complete_task(
    app: &App,
    intern: &User,
    title: &str,
    respond_after: TimeDelta,
    work: TimeDelta,
) -> Result<()> {
    let me = intern.as_caller();
    let task = app.assign(title, intern).await?;
    app.advance(respond_after);
    app.lifecycle.respond(&me, task.id(), TaskResponse::Accept).await?;
    app.lifecycle.start(&me, task.id()).await?;
    app.advance(work);
    app.lifecycle
        .submit(&me, task.id(), vec![NewSubmission::link("https://example.com/done")?])
        .await?;
    app.lifecycle
        .review(&app.admin, task.id(), ReviewDecision::Approve { feedback: None })
        .await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn leaderboard_reflects_completed_work() -> Result<()> {
    let app = App::start().await?;
    let quick = app.approved_intern("Quick").await?;
    let slow = app.approved_intern("Slow").await?;
    let unapproved = app
        .directory
        .register_intern("Waiting", "waiting@example.com")
        .await?;

    complete_task(&app, &quick, "Sort inbox", TimeDelta::minutes(5), TimeDelta::hours(3)).await?;
    complete_task(&app, &quick, "File receipts", TimeDelta::minutes(5), TimeDelta::hours(1))
        .await?;
    complete_task(&app, &slow, "Label boxes", TimeDelta::minutes(25), TimeDelta::hours(2)).await?;

    let board = app.performance.leaderboard(&app.admin).await?;

    let [first, second] = board.as_slice() else {
        bail!("expected two approved interns, got {}", board.len());
    };
    ensure!(first.intern_id == quick.id());
    ensure!(second.intern_id == slow.id());
    ensure!(!board.iter().any(|row| row.intern_id == unapproved.id()));
    // 2 × 25 + 4h × 2 + 2 × 5 + fast responder 10
    ensure!(first.score == 78);
    // 25 + 2h × 2 + 5
    ensure!(second.score == 34);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn reassignment_costs_points() -> Result<()> {
    let app = App::start().await?;
    let gil = app.approved_intern("Gil").await?;

    let ignored = app.assign("Clean fixtures", &gil).await?;
    app.advance(TimeDelta::hours(1));
    app.lifecycle.response_countdown(&app.admin, ignored.id()).await?;
    app.lifecycle.reassign(&app.admin, ignored.id()).await?;

    let board = app.performance.leaderboard(&app.admin).await?;
    let Some(row) = board.first() else {
        bail!("leaderboard should list Gil");
    };
    ensure!(row.stats.reassigned == 1);
    ensure!(row.score == 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn summaries_are_private_to_the_intern() -> Result<()> {
    let app = App::start().await?;
    let hana = app.approved_intern("Hana").await?;
    let ivan = app.approved_intern("Ivan").await?;
    app.assign("Draft survey", &hana).await?;

    let own = app.performance.intern_summary(&hana.as_caller(), hana.id()).await?;
    ensure!(own.pending == 1);
    ensure!(own.tasks.len() == 1);

    let other = app.performance.intern_summary(&ivan.as_caller(), hana.id()).await;
    ensure!(matches!(other, Err(PerformanceServiceError::Unauthorized(_))));
    Ok(())
}
