//! Time log entries recording work and pause intervals.

use super::{ParseTimeLogKindError, TaskId, TimeLogId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Activity recorded by a time log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeLogKind {
    /// The intern was working on the task.
    Work,
    /// The task was paused.
    Pause,
}

impl TimeLogKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Pause => "pause",
        }
    }
}

impl TryFrom<&str> for TimeLogKind {
    type Error = ParseTimeLogKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(Self::Work),
            "pause" => Ok(Self::Pause),
            _ => Err(ParseTimeLogKindError(value.to_owned())),
        }
    }
}

/// One contiguous interval of a single activity. An entry without an end is
/// open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLog {
    id: TimeLogId,
    task_id: TaskId,
    kind: TimeLogKind,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl TimeLog {
    /// Opens a new entry starting at `started_at`.
    #[must_use]
    pub fn open(task_id: TaskId, kind: TimeLogKind, started_at: DateTime<Utc>) -> Self {
        Self {
            id: TimeLogId::new(),
            task_id,
            kind,
            started_at,
            ended_at: None,
        }
    }

    /// Reconstructs an entry from persisted storage.
    ///
    /// Stored data is taken as-is, including inverted intervals; the
    /// accounting engine discards those.
    #[must_use]
    pub const fn from_persisted(
        id: TimeLogId,
        task_id: TaskId,
        kind: TimeLogKind,
        started_at: DateTime<Utc>,
        ended_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            task_id,
            kind,
            started_at,
            ended_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> TimeLogId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the recorded activity.
    #[must_use]
    pub const fn kind(&self) -> TimeLogKind {
        self.kind
    }

    /// Returns the interval start.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the interval end, or `None` while open.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Returns `true` while the entry has no end.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Closes an open entry at `at`, never before its start. Closed entries
    /// are left untouched.
    ///
    /// Returns `true` when the entry was closed by this call.
    pub fn close(&mut self, at: DateTime<Utc>) -> bool {
        if !self.is_open() {
            return false;
        }
        self.ended_at = Some(at.max(self.started_at));
        true
    }
}
