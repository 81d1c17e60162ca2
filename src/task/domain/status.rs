//! Task status state machine and priority levels.

use super::{ParsePriorityError, ParseTaskStatusError};
use serde::{Deserialize, Serialize};

/// Task lifecycle status.
///
/// [`TaskStatus::can_transition_to`] is the single source of truth for which
/// status changes are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Assigned and awaiting the intern's response.
    Pending,
    /// Accepted but work has not started.
    Accepted,
    /// Declined by the intern.
    Declined,
    /// The response window elapsed without a response.
    NoResponse,
    /// Work is underway.
    InProgress,
    /// Work is temporarily paused.
    Paused,
    /// Deliverables were submitted and await review.
    UnderReview,
    /// Approved by an administrator.
    Completed,
    /// Returned by an administrator for rework.
    Rejected,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 9] = [
        Self::Pending,
        Self::Accepted,
        Self::Declined,
        Self::NoResponse,
        Self::InProgress,
        Self::Paused,
        Self::UnderReview,
        Self::Completed,
        Self::Rejected,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::NoResponse => "no_response",
            Self::InProgress => "in_progress",
            Self::Paused => "paused",
            Self::UnderReview => "under_review",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    /// Returns `true` when moving from `self` to `target` is permitted.
    ///
    /// `Pending -> Pending` and `NoResponse -> Pending` are the reassignment
    /// edges; `Rejected -> UnderReview` is resubmission.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Pending,
                Self::Accepted | Self::Declined | Self::NoResponse | Self::Pending
            ) | (Self::NoResponse, Self::Pending)
                | (Self::Accepted, Self::InProgress)
                | (Self::InProgress, Self::Paused | Self::UnderReview)
                | (Self::Paused, Self::InProgress)
                | (Self::UnderReview, Self::Completed | Self::Rejected)
                | (Self::Rejected, Self::UnderReview)
        )
    }

    /// Returns `true` when no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Declined)
    }

    /// Returns `true` while work time may be accruing.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::InProgress | Self::Paused)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseTaskStatusError(value.to_owned()))
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}
