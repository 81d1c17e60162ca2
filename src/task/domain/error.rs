//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or transitioning domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The requested state transition is not permitted.
    #[error("invalid state transition for task {task_id} from {} to {}", from.as_str(), to.as_str())]
    InvalidStateTransition {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Current state.
        from: TaskStatus,
        /// Requested state.
        to: TaskStatus,
    },

    /// Reassignment was attempted while the intern can still respond.
    #[error("response window for task {0} is still open")]
    ResponseWindowOpen(TaskId),

    /// A decline was submitted without a reason.
    #[error("declining a task requires a reason")]
    MissingDeclineReason,

    /// A submission batch was empty.
    #[error("at least one submission is required")]
    NoSubmissions,

    /// A submission URL was empty after trimming.
    #[error("submission url must not be empty")]
    EmptySubmissionUrl,
}

impl TaskDomainError {
    /// Returns `true` for input validation failures, as opposed to lifecycle
    /// violations.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyTitle
                | Self::MissingDeclineReason
                | Self::NoSubmissions
                | Self::EmptySubmissionUrl
        )
    }
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Error returned while parsing time log kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown time log kind: {0}")]
pub struct ParseTimeLogKindError(pub String);

/// Error returned while parsing submission kinds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown submission kind: {0}")]
pub struct ParseSubmissionKindError(pub String);
