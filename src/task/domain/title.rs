//! Validated task title carrying the reassignment marker.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty task title.
///
/// Reassigned tasks are tagged by appending [`TaskTitle::REASSIGNED_MARKER`];
/// the performance engine counts reassignments by looking for the marker.
///
/// # Examples
///
/// ```
/// use taskmaster::task::domain::TaskTitle;
///
/// let title = TaskTitle::new("Write onboarding guide").expect("valid title");
/// let tagged = title.mark_reassigned().mark_reassigned();
/// assert_eq!(tagged.as_str(), "Write onboarding guide (Reassigned)");
/// assert!(tagged.is_reassigned());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Tag appended to the title of a reassigned task.
    pub const REASSIGNED_MARKER: &'static str = "(Reassigned)";

    /// Creates a validated, trimmed title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the title carries the reassignment marker.
    #[must_use]
    pub fn is_reassigned(&self) -> bool {
        self.0.contains(Self::REASSIGNED_MARKER)
    }

    /// Returns the title tagged as reassigned. Already tagged titles are
    /// returned unchanged.
    #[must_use]
    pub fn mark_reassigned(&self) -> Self {
        if self.is_reassigned() {
            return self.clone();
        }
        Self(format!("{} {}", self.0, Self::REASSIGNED_MARKER))
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
