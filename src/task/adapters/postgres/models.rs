//! Diesel row models for task persistence.

use super::schema::{submissions, tasks, time_logs};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Priority.
    pub priority: String,
    /// Delivery deadline.
    pub deadline: DateTime<Utc>,
    /// Assigned intern.
    pub assignee_id: uuid::Uuid,
    /// Creating administrator.
    pub creator_id: uuid::Uuid,
    /// Lifecycle status.
    pub status: String,
    /// Decline reason.
    pub decline_reason: Option<String>,
    /// Review feedback.
    pub review_feedback: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic-lock counter.
    pub lock_version: i32,
}

/// Insert and update model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Priority.
    pub priority: String,
    /// Delivery deadline.
    pub deadline: DateTime<Utc>,
    /// Assigned intern.
    pub assignee_id: uuid::Uuid,
    /// Creating administrator.
    pub creator_id: uuid::Uuid,
    /// Lifecycle status.
    pub status: String,
    /// Decline reason.
    pub decline_reason: Option<String>,
    /// Review feedback.
    pub review_feedback: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optimistic-lock counter.
    pub lock_version: i32,
}

/// Row model for time log entries, used for both reads and upserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = time_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TimeLogRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Recorded activity.
    pub kind: String,
    /// Interval start.
    pub started_at: DateTime<Utc>,
    /// Interval end.
    pub ended_at: Option<DateTime<Utc>>,
}

/// Row model for submissions, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = submissions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SubmissionRow {
    /// Submission identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Deliverable kind.
    pub kind: String,
    /// Deliverable URL.
    pub url: String,
    /// Attachment timestamp.
    pub created_at: DateTime<Utc>,
}
