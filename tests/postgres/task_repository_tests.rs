//! `PostgreSQL` integration tests for task aggregates.

use super::helpers::{BoxError, TestDatabase, test_runtime};
use crate::test_helpers::{SharedClock, epoch};
use chrono::TimeDelta;
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use taskmaster::{
    intern::{
        domain::{EmailAddress, User, UserId},
        ports::UserRepository,
    },
    task::{
        adapters::postgres::PostgresTaskRepository,
        domain::{
            LifecyclePolicy, NewSubmission, NewTaskData, Task, TaskPriority, TaskResponse,
            TaskStatus, TaskTitle,
        },
        ports::{TaskRepository, TaskRepositoryError},
    },
};

struct Fixture {
    repository: PostgresTaskRepository,
    clock: SharedClock,
    admin: UserId,
    intern: UserId,
    _database: TestDatabase,
}

async fn fixture(database: TestDatabase) -> Result<Fixture, BoxError> {
    let clock = SharedClock::new();
    let users = database.user_repository();
    let admin = User::new_admin("Grace", EmailAddress::new("grace@example.com")?, &clock)?;
    let mut intern =
        User::register_intern("Alice", EmailAddress::new("alice@example.com")?, &clock)?;
    intern.approve(&clock)?;
    users.store(&admin).await?;
    users.store(&intern).await?;

    Ok(Fixture {
        repository: database.task_repository(),
        _database: database,
        clock,
        admin: admin.id(),
        intern: intern.id(),
    })
}

impl Fixture {
    fn new_task(&self, title: &str) -> Result<Task, BoxError> {
        Ok(Task::new(
            NewTaskData {
                title: TaskTitle::new(title)?,
                description: "Stored in PostgreSQL".to_owned(),
                priority: TaskPriority::High,
                deadline: epoch() + TimeDelta::days(2),
                assignee_id: self.intern,
                creator_id: self.admin,
            },
            &self.clock,
        ))
    }
}

#[rstest]
fn aggregate_round_trips_through_commits(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let database = TestDatabase::create(shared_test_cluster)?;
    test_runtime()?.block_on(async {
        let fx = fixture(database).await?;
        let mut task = fx.new_task("Index the archive")?;
        fx.repository.store(&task).await?;

        let policy = LifecyclePolicy::default();
        task.respond(TaskResponse::Accept, &policy, &fx.clock)?;
        task = fx.repository.commit(&task, TaskStatus::Pending).await?;
        task.start(&fx.clock)?;
        task = fx.repository.commit(&task, TaskStatus::Accepted).await?;
        fx.clock.advance(TimeDelta::minutes(40));
        task.pause(&fx.clock)?;
        task = fx.repository.commit(&task, TaskStatus::InProgress).await?;
        fx.clock.advance(TimeDelta::minutes(10));
        task.resume(&fx.clock)?;
        task = fx.repository.commit(&task, TaskStatus::Paused).await?;
        fx.clock.advance(TimeDelta::minutes(20));
        task.submit(vec![NewSubmission::link("https://example.com/archive")?], &fx.clock)?;
        task = fx.repository.commit(&task, TaskStatus::InProgress).await?;

        let stored = fx.repository.find_by_id(task.id()).await?;
        assert_eq!(stored.as_ref(), Some(&task));
        let Some(reloaded) = stored else {
            return Err("task should exist".into());
        };
        assert_eq!(reloaded.lock_version(), 5);
        assert_eq!(reloaded.time_logs().len(), 3);
        assert!(!reloaded.has_open_log());
        assert_eq!(reloaded.submissions().len(), 1);
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn stale_commit_reports_the_stored_status(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let database = TestDatabase::create(shared_test_cluster)?;
    test_runtime()?.block_on(async {
        let fx = fixture(database).await?;
        let policy = LifecyclePolicy::default();
        let mut task = fx.new_task("Merge duplicates")?;
        fx.repository.store(&task).await?;
        task.respond(TaskResponse::Accept, &policy, &fx.clock)?;
        fx.repository.commit(&task, TaskStatus::Pending).await?;

        let result = fx.repository.commit(&task, TaskStatus::Pending).await;

        assert!(matches!(
            result,
            Err(TaskRepositoryError::StatusConflict {
                expected: TaskStatus::Pending,
                actual: TaskStatus::Accepted,
                ..
            })
        ));
        let missing = fx
            .repository
            .commit(&fx.new_task("Never stored")?, TaskStatus::Pending)
            .await;
        assert!(matches!(missing, Err(TaskRepositoryError::NotFound(_))));
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn concurrent_restarts_of_one_snapshot_leave_one_open_log(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let database = TestDatabase::create(shared_test_cluster)?;
    test_runtime()?.block_on(async {
        let fx = fixture(database).await?;
        let policy = LifecyclePolicy::default();
        let mut task = fx.new_task("Reconcile timesheets")?;
        fx.repository.store(&task).await?;
        task.respond(TaskResponse::Accept, &policy, &fx.clock)?;
        task.start(&fx.clock)?;
        fx.repository.commit(&task, TaskStatus::Pending).await?;

        let Some(mut first) = fx.repository.find_by_id(task.id()).await? else {
            return Err("task should exist".into());
        };
        let Some(mut second) = fx.repository.find_by_id(task.id()).await? else {
            return Err("task should exist".into());
        };
        fx.clock.advance(TimeDelta::minutes(15));
        first.start(&fx.clock)?;
        second.start(&fx.clock)?;
        fx.repository.commit(&first, TaskStatus::InProgress).await?;
        let lost = fx.repository.commit(&second, TaskStatus::InProgress).await;

        assert!(matches!(
            lost,
            Err(TaskRepositoryError::StatusConflict {
                expected: TaskStatus::InProgress,
                actual: TaskStatus::InProgress,
                ..
            })
        ));
        let Some(reloaded) = fx.repository.find_by_id(task.id()).await? else {
            return Err("task should exist".into());
        };
        assert_eq!(reloaded.open_logs().count(), 1);
        assert_eq!(reloaded.time_logs().len(), 2);
        assert_eq!(reloaded.lock_version(), first.lock_version() + 1);
        Ok::<(), BoxError>(())
    })
}

#[rstest]
fn batches_are_listed_newest_first_and_deleted_with_children(
    shared_test_cluster: &'static TestCluster,
) -> Result<(), BoxError> {
    let database = TestDatabase::create(shared_test_cluster)?;
    test_runtime()?.block_on(async {
        let fx = fixture(database).await?;
        let older = fx.new_task("First")?;
        fx.clock.advance(TimeDelta::minutes(1));
        let mut newer = fx.new_task("Second")?;
        fx.repository.store_many(&[older.clone(), newer.clone()]).await?;

        let duplicate = fx.repository.store_many(&[older.clone()]).await;
        assert!(matches!(duplicate, Err(TaskRepositoryError::DuplicateTask(_))));

        let listed: Vec<_> = fx
            .repository
            .list_by_assignee(fx.intern)
            .await?
            .iter()
            .map(Task::id)
            .collect();
        assert_eq!(listed, vec![newer.id(), older.id()]);

        let policy = LifecyclePolicy::default();
        newer.respond(TaskResponse::Accept, &policy, &fx.clock)?;
        newer.start(&fx.clock)?;
        fx.repository.commit(&newer, TaskStatus::Pending).await?;
        fx.repository.delete(newer.id()).await?;

        assert_eq!(fx.repository.find_by_id(newer.id()).await?, None);
        assert_eq!(fx.repository.list_all().await?.len(), 1);
        assert!(matches!(
            fx.repository.delete(newer.id()).await,
            Err(TaskRepositoryError::NotFound(_))
        ));
        Ok::<(), BoxError>(())
    })
}
