//! Outbound notification port for new assignments.

use crate::task::domain::{TaskId, TaskPriority};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Everything a notification needs to describe a new assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskAssignmentNotice {
    /// Assigned task.
    pub task_id: TaskId,
    /// Task title as stored.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Task priority.
    pub priority: TaskPriority,
    /// Delivery deadline.
    pub deadline: DateTime<Utc>,
    /// Recipient display name.
    pub intern_name: String,
    /// Recipient address.
    pub intern_email: String,
}

/// Result type for notifier operations.
pub type TaskNotifierResult<T> = Result<T, TaskNotifierError>;

/// Delivers assignment notifications.
///
/// Delivery is best-effort: callers log failures and carry on.
#[async_trait]
pub trait TaskNotifier: Send + Sync {
    /// Notifies an intern about a new assignment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskNotifierError`] when rendering or delivery fails.
    async fn send_task_assignment(&self, notice: &TaskAssignmentNotice) -> TaskNotifierResult<()>;
}

/// A rendered message ready for a mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
}

/// Low-level mail delivery.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Sends one message.
    ///
    /// # Errors
    ///
    /// Returns [`TaskNotifierError::Delivery`] when the transport rejects the
    /// message.
    async fn send(&self, mail: OutgoingMail) -> TaskNotifierResult<()>;
}

/// Errors returned by notifier implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskNotifierError {
    /// The message template could not be rendered.
    #[error("failed to render notification: {0}")]
    Render(String),

    /// The transport failed to deliver the message.
    #[error("failed to deliver notification: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskNotifierError {
    /// Wraps a transport error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
