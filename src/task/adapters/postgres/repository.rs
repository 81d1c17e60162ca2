//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{NewTaskRow, SubmissionRow, TaskRow, TimeLogRow},
    schema::{submissions, tasks, time_logs},
};
use crate::intern::domain::UserId;
use crate::task::{
    domain::{
        PersistedTaskData, Submission, SubmissionId, SubmissionKind, Task, TaskId, TaskPriority,
        TaskStatus, TaskTitle, TimeLog, TimeLogId, TimeLogKind,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::upsert::excluded;
use std::collections::HashMap;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// Every write runs in a single transaction covering the task row, its time
/// log entries, and its submissions.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// Rows making up one task aggregate.
struct AggregateRows {
    task: NewTaskRow,
    time_logs: Vec<TimeLogRow>,
    submissions: Vec<SubmissionRow>,
}

impl AggregateRows {
    fn from_task(task: &Task) -> Self {
        Self {
            task: to_task_row(task),
            time_logs: task.time_logs().iter().map(to_time_log_row).collect(),
            submissions: task.submissions().iter().map(to_submission_row).collect(),
        }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let rows = AggregateRows::from_task(task);
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| insert_aggregate(tx, &rows))
        })
        .await
    }

    async fn store_many(&self, batch: &[Task]) -> TaskRepositoryResult<()> {
        let rows: Vec<AggregateRows> = batch.iter().map(AggregateRows::from_task).collect();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                for aggregate in &rows {
                    insert_aggregate(tx, aggregate)?;
                }
                Ok(())
            })
        })
        .await
    }

    async fn commit(&self, task: &Task, expected: TaskStatus) -> TaskRepositoryResult<Task> {
        let task_id = task.id();
        let read_version = task.lock_version();
        let mut committed = task.clone();
        committed.advance_lock_version();
        let rows = AggregateRows::from_task(&committed);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let updated = diesel::update(
                    tasks::table
                        .filter(tasks::id.eq(task_id.into_inner()))
                        .filter(tasks::status.eq(expected.as_str()))
                        .filter(tasks::lock_version.eq(read_version)),
                )
                .set(&rows.task)
                .execute(tx)
                .map_err(TaskRepositoryError::persistence)?;

                if updated == 0 {
                    return Err(classify_missed_update(tx, task_id, expected)?);
                }

                upsert_time_logs(tx, &rows.time_logs)?;
                insert_submissions(tx, &rows.submissions)?;
                Ok(())
            })
        })
        .await?;
        Ok(committed)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            let loaded = load_aggregates(connection, row.into_iter().collect())?;
            Ok(loaded.into_iter().next())
        })
        .await
    }

    async fn list_by_assignee(&self, assignee: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::assignee_id.eq(assignee.into_inner()))
                .select(TaskRow::as_select())
                .order((tasks::created_at.desc(), tasks::id.asc()))
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            load_aggregates(connection, rows)
        })
        .await
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .select(TaskRow::as_select())
                .order((tasks::created_at.desc(), tasks::id.asc()))
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            load_aggregates(connection, rows)
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let raw_id = id.into_inner();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                diesel::delete(time_logs::table.filter(time_logs::task_id.eq(raw_id)))
                    .execute(tx)
                    .map_err(TaskRepositoryError::persistence)?;
                diesel::delete(submissions::table.filter(submissions::task_id.eq(raw_id)))
                    .execute(tx)
                    .map_err(TaskRepositoryError::persistence)?;
                let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(raw_id)))
                    .execute(tx)
                    .map_err(TaskRepositoryError::persistence)?;
                if deleted == 0 {
                    return Err(TaskRepositoryError::NotFound(id));
                }
                Ok(())
            })
        })
        .await
    }
}

fn insert_aggregate(connection: &mut PgConnection, rows: &AggregateRows) -> TaskRepositoryResult<()> {
    let task_id = TaskId::from_uuid(rows.task.id);
    diesel::insert_into(tasks::table)
        .values(&rows.task)
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                TaskRepositoryError::DuplicateTask(task_id)
            }
            _ => TaskRepositoryError::persistence(err),
        })?;
    upsert_time_logs(connection, &rows.time_logs)?;
    insert_submissions(connection, &rows.submissions)
}

fn upsert_time_logs(connection: &mut PgConnection, rows: &[TimeLogRow]) -> TaskRepositoryResult<()> {
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(time_logs::table)
        .values(rows)
        .on_conflict(time_logs::id)
        .do_update()
        .set(time_logs::ended_at.eq(excluded(time_logs::ended_at)))
        .execute(connection)
        .map_err(TaskRepositoryError::persistence)?;
    Ok(())
}

fn insert_submissions(
    connection: &mut PgConnection,
    rows: &[SubmissionRow],
) -> TaskRepositoryResult<()> {
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(submissions::table)
        .values(rows)
        .on_conflict(submissions::id)
        .do_nothing()
        .execute(connection)
        .map_err(TaskRepositoryError::persistence)?;
    Ok(())
}

/// Explains why a guarded update touched no row. A stored status equal to
/// `expected` means another writer committed the same snapshot first.
fn classify_missed_update(
    connection: &mut PgConnection,
    task_id: TaskId,
    expected: TaskStatus,
) -> TaskRepositoryResult<TaskRepositoryError> {
    let stored = tasks::table
        .filter(tasks::id.eq(task_id.into_inner()))
        .select(tasks::status)
        .first::<String>(connection)
        .optional()
        .map_err(TaskRepositoryError::persistence)?;
    let Some(stored_status) = stored else {
        return Ok(TaskRepositoryError::NotFound(task_id));
    };
    let actual =
        TaskStatus::try_from(stored_status.as_str()).map_err(TaskRepositoryError::persistence)?;
    Ok(TaskRepositoryError::StatusConflict {
        task_id,
        expected,
        actual,
    })
}

fn load_aggregates(
    connection: &mut PgConnection,
    rows: Vec<TaskRow>,
) -> TaskRepositoryResult<Vec<Task>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<uuid::Uuid> = rows.iter().map(|row| row.id).collect();

    let log_rows = time_logs::table
        .filter(time_logs::task_id.eq_any(ids.clone()))
        .select(TimeLogRow::as_select())
        .order((time_logs::started_at.asc(), time_logs::id.asc()))
        .load::<TimeLogRow>(connection)
        .map_err(TaskRepositoryError::persistence)?;
    let submission_rows = submissions::table
        .filter(submissions::task_id.eq_any(ids))
        .select(SubmissionRow::as_select())
        .order((submissions::created_at.asc(), submissions::id.asc()))
        .load::<SubmissionRow>(connection)
        .map_err(TaskRepositoryError::persistence)?;

    let mut logs_by_task: HashMap<uuid::Uuid, Vec<TimeLog>> = HashMap::new();
    for log_row in log_rows {
        let owner = log_row.task_id;
        logs_by_task
            .entry(owner)
            .or_default()
            .push(row_to_time_log(log_row)?);
    }
    let mut submissions_by_task: HashMap<uuid::Uuid, Vec<Submission>> = HashMap::new();
    for submission_row in submission_rows {
        let owner = submission_row.task_id;
        submissions_by_task
            .entry(owner)
            .or_default()
            .push(row_to_submission(submission_row)?);
    }

    rows.into_iter()
        .map(|row| {
            let logs = logs_by_task.remove(&row.id).unwrap_or_default();
            let attached = submissions_by_task.remove(&row.id).unwrap_or_default();
            row_to_task(row, logs, attached)
        })
        .collect()
}

fn to_task_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        priority: task.priority().as_str().to_owned(),
        deadline: task.deadline(),
        assignee_id: task.assignee_id().into_inner(),
        creator_id: task.creator_id().into_inner(),
        status: task.status().as_str().to_owned(),
        decline_reason: task.decline_reason().map(str::to_owned),
        review_feedback: task.review_feedback().map(str::to_owned),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        lock_version: task.lock_version(),
    }
}

fn to_time_log_row(log: &TimeLog) -> TimeLogRow {
    TimeLogRow {
        id: log.id().into_inner(),
        task_id: log.task_id().into_inner(),
        kind: log.kind().as_str().to_owned(),
        started_at: log.started_at(),
        ended_at: log.ended_at(),
    }
}

fn to_submission_row(submission: &Submission) -> SubmissionRow {
    SubmissionRow {
        id: submission.id().into_inner(),
        task_id: submission.task_id().into_inner(),
        kind: submission.kind().as_str().to_owned(),
        url: submission.url().to_owned(),
        created_at: submission.created_at(),
    }
}

fn row_to_time_log(row: TimeLogRow) -> TaskRepositoryResult<TimeLog> {
    let kind = TimeLogKind::try_from(row.kind.as_str()).map_err(TaskRepositoryError::persistence)?;
    Ok(TimeLog::from_persisted(
        TimeLogId::from_uuid(row.id),
        TaskId::from_uuid(row.task_id),
        kind,
        row.started_at,
        row.ended_at,
    ))
}

fn row_to_submission(row: SubmissionRow) -> TaskRepositoryResult<Submission> {
    let kind =
        SubmissionKind::try_from(row.kind.as_str()).map_err(TaskRepositoryError::persistence)?;
    Ok(Submission::from_persisted(
        SubmissionId::from_uuid(row.id),
        TaskId::from_uuid(row.task_id),
        kind,
        row.url,
        row.created_at,
    ))
}

fn row_to_task(
    row: TaskRow,
    time_logs: Vec<TimeLog>,
    submissions: Vec<Submission>,
) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title: persisted_title,
        description,
        priority: persisted_priority,
        deadline,
        assignee_id,
        creator_id,
        status: persisted_status,
        decline_reason,
        review_feedback,
        created_at,
        updated_at,
        lock_version,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description,
        priority,
        deadline,
        assignee_id: UserId::from_uuid(assignee_id),
        creator_id: UserId::from_uuid(creator_id),
        status,
        decline_reason,
        review_feedback,
        time_logs,
        submissions,
        created_at,
        updated_at,
        lock_version,
    }))
}
