//! Deliverables attached to a task for review.

use super::{ParseSubmissionKindError, SubmissionId, TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of deliverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    /// An external link.
    Link,
    /// An uploaded image hosted by the asset provider.
    Image,
}

impl SubmissionKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Image => "image",
        }
    }
}

impl TryFrom<&str> for SubmissionKind {
    type Error = ParseSubmissionKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "link" => Ok(Self::Link),
            "image" => Ok(Self::Image),
            _ => Err(ParseSubmissionKindError(value.to_owned())),
        }
    }
}

/// A deliverable supplied by the intern, before it is attached to a task.
///
/// The URL is opaque: any non-empty value returned by the upload handshake or
/// typed by the intern is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubmission {
    kind: SubmissionKind,
    url: String,
}

impl NewSubmission {
    /// Creates a validated submission entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptySubmissionUrl`] when the URL is blank.
    pub fn new(kind: SubmissionKind, url: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = url.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptySubmissionUrl);
        }
        Ok(Self {
            kind,
            url: trimmed.to_owned(),
        })
    }

    /// Shorthand for a link submission.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptySubmissionUrl`] when the URL is blank.
    pub fn link(url: impl Into<String>) -> Result<Self, TaskDomainError> {
        Self::new(SubmissionKind::Link, url)
    }

    /// Shorthand for an uploaded image submission.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptySubmissionUrl`] when the URL is blank.
    pub fn image(url: impl Into<String>) -> Result<Self, TaskDomainError> {
        Self::new(SubmissionKind::Image, url)
    }
}

/// A deliverable attached to a task. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    id: SubmissionId,
    task_id: TaskId,
    kind: SubmissionKind,
    url: String,
    created_at: DateTime<Utc>,
}

impl Submission {
    /// Attaches a new submission to a task.
    #[must_use]
    pub fn attach(task_id: TaskId, entry: NewSubmission, created_at: DateTime<Utc>) -> Self {
        Self {
            id: SubmissionId::new(),
            task_id,
            kind: entry.kind,
            url: entry.url,
            created_at,
        }
    }

    /// Reconstructs a submission from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: SubmissionId,
        task_id: TaskId,
        kind: SubmissionKind,
        url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            kind,
            url,
            created_at,
        }
    }

    /// Returns the submission identifier.
    #[must_use]
    pub const fn id(&self) -> SubmissionId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the deliverable kind.
    #[must_use]
    pub const fn kind(&self) -> SubmissionKind {
        self.kind
    }

    /// Returns the deliverable URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the attachment timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
