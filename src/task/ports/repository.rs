//! Repository port for task persistence and lookup.

use crate::intern::domain::UserId;
use crate::task::domain::{Task, TaskId, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// A task is stored together with its time log entries and submissions; every
/// write covers the whole aggregate so a transition is never half-applied.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Stores a batch of new tasks atomically.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when any task ID
    /// already exists; nothing is stored in that case.
    async fn store_many(&self, tasks: &[Task]) -> TaskRepositoryResult<()>;

    /// Persists a transitioned task, provided its stored status still equals
    /// `expected` and its stored lock version still equals
    /// [`Task::lock_version`].
    ///
    /// Status, fields, new and closed time log entries, and new submissions
    /// are written in one unit. Returns the task as stored, carrying the
    /// advanced lock version.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::StatusConflict`] when another writer
    /// committed first.
    async fn commit(&self, task: &Task, expected: TaskStatus) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task assigned to `assignee`, newest first.
    async fn list_by_assignee(&self, assignee: UserId) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns every task, newest first.
    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Deletes a task together with its time log entries and submissions.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored task changed after the snapshot the write was based on:
    /// another writer moved its status or committed the same snapshot first.
    #[error(
        "task {task_id} changed concurrently: expected {}, found {}",
        expected.as_str(),
        actual.as_str()
    )]
    StatusConflict {
        /// Task whose write lost the race.
        task_id: TaskId,
        /// Status the caller read.
        expected: TaskStatus,
        /// Status currently stored.
        actual: TaskStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
