//! Task aggregate root and its lifecycle transitions.

use super::{
    LifecyclePolicy, NewSubmission, Submission, TaskDomainError, TaskId, TaskPriority, TaskStatus,
    TaskTitle, TimeLog, TimeLogKind,
};
use crate::intern::domain::UserId;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// An intern's answer to a pending assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum TaskResponse {
    /// The intern takes the task on.
    Accept,
    /// The intern refuses the task.
    Decline {
        /// Why the task was declined. Must not be blank.
        reason: String,
    },
}

impl TaskResponse {
    /// Status the task moves to when the response is recorded.
    #[must_use]
    pub const fn target_status(&self) -> TaskStatus {
        match self {
            Self::Accept => TaskStatus::Accepted,
            Self::Decline { .. } => TaskStatus::Declined,
        }
    }
}

/// Result of a response attempt that did not fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespondOutcome {
    /// The decision was applied.
    Recorded,
    /// The window had closed; the task was moved to
    /// [`TaskStatus::NoResponse`] instead and the decision was discarded.
    WindowExpired,
}

/// An administrator's verdict on submitted work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ReviewDecision {
    /// Accept the work and complete the task.
    Approve {
        /// Optional praise or notes.
        feedback: Option<String>,
    },
    /// Return the work for rework.
    Reject {
        /// What needs to change.
        feedback: String,
    },
}

impl ReviewDecision {
    /// Status the task moves to when the decision is applied.
    #[must_use]
    pub const fn target_status(&self) -> TaskStatus {
        match self {
            Self::Approve { .. } => TaskStatus::Completed,
            Self::Reject { .. } => TaskStatus::Rejected,
        }
    }

    /// Returns `true` for a rejection whose feedback is blank.
    #[must_use]
    pub fn is_unexplained_rejection(&self) -> bool {
        matches!(self, Self::Reject { feedback } if feedback.trim().is_empty())
    }
}

/// Parameter object for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Validated title.
    pub title: TaskTitle,
    /// Free-form description.
    pub description: String,
    /// Priority.
    pub priority: TaskPriority,
    /// Delivery deadline.
    pub deadline: DateTime<Utc>,
    /// Intern the task is assigned to.
    pub assignee_id: UserId,
    /// Administrator creating the task.
    pub creator_id: UserId,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: String,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted deadline.
    pub deadline: DateTime<Utc>,
    /// Persisted assignee.
    pub assignee_id: UserId,
    /// Persisted creator.
    pub creator_id: UserId,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted decline reason, if any.
    pub decline_reason: Option<String>,
    /// Persisted review feedback, if any.
    pub review_feedback: Option<String>,
    /// Persisted time log entries.
    pub time_logs: Vec<TimeLog>,
    /// Persisted submissions.
    pub submissions: Vec<Submission>,
    /// Persisted creation timestamp (restarted by reassignment).
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted optimistic-lock counter.
    pub lock_version: i32,
}

/// Task aggregate root.
///
/// The task owns its time logs and submissions. Every lifecycle method
/// validates against [`TaskStatus::can_transition_to`] and leaves the task
/// untouched on error.
///
/// `lock_version` counts committed writes. Repositories only accept a commit
/// whose version matches the stored one, so two writers holding the same
/// snapshot cannot both succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: String,
    priority: TaskPriority,
    deadline: DateTime<Utc>,
    assignee_id: UserId,
    creator_id: UserId,
    status: TaskStatus,
    decline_reason: Option<String>,
    review_feedback: Option<String>,
    time_logs: Vec<TimeLog>,
    submissions: Vec<Submission>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    lock_version: i32,
}

impl Task {
    /// Creates a pending task.
    #[must_use]
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title: data.title,
            description: data.description,
            priority: data.priority,
            deadline: data.deadline,
            assignee_id: data.assignee_id,
            creator_id: data.creator_id,
            status: TaskStatus::Pending,
            decline_reason: None,
            review_feedback: None,
            time_logs: Vec::new(),
            submissions: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
            lock_version: 0,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        let mut time_logs = data.time_logs;
        time_logs.sort_by_key(TimeLog::started_at);
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            deadline: data.deadline,
            assignee_id: data.assignee_id,
            creator_id: data.creator_id,
            status: data.status,
            decline_reason: data.decline_reason,
            review_feedback: data.review_feedback,
            time_logs,
            submissions: data.submissions,
            created_at: data.created_at,
            updated_at: data.updated_at,
            lock_version: data.lock_version,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the delivery deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Returns the assigned intern.
    #[must_use]
    pub const fn assignee_id(&self) -> UserId {
        self.assignee_id
    }

    /// Returns the creating administrator.
    #[must_use]
    pub const fn creator_id(&self) -> UserId {
        self.creator_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the decline reason, if the task was declined.
    #[must_use]
    pub fn decline_reason(&self) -> Option<&str> {
        self.decline_reason.as_deref()
    }

    /// Returns the latest review feedback, if any.
    #[must_use]
    pub fn review_feedback(&self) -> Option<&str> {
        self.review_feedback.as_deref()
    }

    /// Returns time log entries ordered by start.
    #[must_use]
    pub fn time_logs(&self) -> &[TimeLog] {
        &self.time_logs
    }

    /// Returns attached submissions in attachment order.
    #[must_use]
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Returns the creation timestamp; reassignment restarts it.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the number of commits the snapshot was read after.
    #[must_use]
    pub const fn lock_version(&self) -> i32 {
        self.lock_version
    }

    /// Marks the snapshot as committed once more.
    pub(crate) const fn advance_lock_version(&mut self) {
        self.lock_version = self.lock_version.saturating_add(1);
    }

    /// Returns `true` when the title carries the reassignment marker.
    #[must_use]
    pub fn is_reassigned(&self) -> bool {
        self.title.is_reassigned()
    }

    /// Returns entries without an end.
    pub fn open_logs(&self) -> impl Iterator<Item = &TimeLog> {
        self.time_logs.iter().filter(|log| log.is_open())
    }

    /// Returns `true` when any entry is still open.
    #[must_use]
    pub fn has_open_log(&self) -> bool {
        self.open_logs().next().is_some()
    }

    /// Returns the instant after which the intern can no longer respond.
    #[must_use]
    pub fn response_deadline(&self, policy: &LifecyclePolicy) -> DateTime<Utc> {
        self.created_at
            .checked_add_signed(policy.response_window())
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Returns `true` while `now` is within the response window (inclusive).
    #[must_use]
    pub fn is_response_window_open(&self, policy: &LifecyclePolicy, now: DateTime<Utc>) -> bool {
        now <= self.response_deadline(policy)
    }

    /// Returns the time left to respond, or zero once the task is no longer
    /// pending or the window has closed.
    #[must_use]
    pub fn response_time_remaining(
        &self,
        policy: &LifecyclePolicy,
        now: DateTime<Utc>,
    ) -> TimeDelta {
        if self.status != TaskStatus::Pending {
            return TimeDelta::zero();
        }
        (self.response_deadline(policy) - now).max(TimeDelta::zero())
    }

    /// Moves a pending task whose window has elapsed to
    /// [`TaskStatus::NoResponse`].
    ///
    /// Returns `true` when the status changed.
    pub fn expire_response_window(&mut self, policy: &LifecyclePolicy, clock: &impl Clock) -> bool {
        let now = clock.utc();
        if self.status != TaskStatus::Pending || self.is_response_window_open(policy, now) {
            return false;
        }
        self.status = TaskStatus::NoResponse;
        self.updated_at = now;
        true
    }

    /// Records the intern's response to a pending assignment.
    ///
    /// After the window has elapsed the task is moved to
    /// [`TaskStatus::NoResponse`] whatever the decision, and
    /// [`RespondOutcome::WindowExpired`] is returned so the caller can persist
    /// the correction and report the failure. A task already marked
    /// unanswered reports the same outcome and stays unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// pending or unanswered, and [`TaskDomainError::MissingDeclineReason`]
    /// for a decline with a blank reason inside the window.
    pub fn respond(
        &mut self,
        response: TaskResponse,
        policy: &LifecyclePolicy,
        clock: &impl Clock,
    ) -> Result<RespondOutcome, TaskDomainError> {
        if self.status == TaskStatus::NoResponse || self.expire_response_window(policy, clock) {
            return Ok(RespondOutcome::WindowExpired);
        }
        self.ensure_transition(response.target_status())?;

        let decline_reason = match response {
            TaskResponse::Accept => None,
            TaskResponse::Decline { reason } => {
                let trimmed = reason.trim();
                if trimmed.is_empty() {
                    return Err(TaskDomainError::MissingDeclineReason);
                }
                Some(trimmed.to_owned())
            }
        };
        self.status = if decline_reason.is_some() {
            TaskStatus::Declined
        } else {
            TaskStatus::Accepted
        };
        self.decline_reason = decline_reason;
        self.touch(clock);
        Ok(RespondOutcome::Recorded)
    }

    /// Starts work: closes every open entry, moves to
    /// [`TaskStatus::InProgress`], and opens a work entry.
    ///
    /// Besides the regular `Accepted -> InProgress` edge, an active task that
    /// still has an open entry may be restarted. That absorbs duplicate start
    /// requests without ever leaving two open work entries behind.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] from any other
    /// status.
    pub fn start(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        let is_restart = self.status.is_active() && self.has_open_log();
        if !is_restart {
            self.ensure_transition(TaskStatus::InProgress)?;
        }
        let now = clock.utc();
        self.close_open_logs(now);
        self.status = TaskStatus::InProgress;
        self.time_logs
            .push(TimeLog::open(self.id, TimeLogKind::Work, now));
        self.updated_at = now;
        Ok(())
    }

    /// Pauses work: closes the latest open work entry and opens a pause
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// in progress.
    pub fn pause(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.switch_activity(TaskStatus::Paused, TimeLogKind::Work, TimeLogKind::Pause, clock)
    }

    /// Resumes work: closes the latest open pause entry and opens a work
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// paused.
    pub fn resume(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.switch_activity(
            TaskStatus::InProgress,
            TimeLogKind::Pause,
            TimeLogKind::Work,
            clock,
        )
    }

    /// Submits deliverables for review: closes every open entry, moves to
    /// [`TaskStatus::UnderReview`], and attaches the batch.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// in progress or rejected, and [`TaskDomainError::NoSubmissions`] for an
    /// empty batch.
    pub fn submit(
        &mut self,
        entries: Vec<NewSubmission>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_can_submit()?;
        if entries.is_empty() {
            return Err(TaskDomainError::NoSubmissions);
        }
        let now = clock.utc();
        self.close_open_logs(now);
        self.status = TaskStatus::UnderReview;
        self.submissions.extend(
            entries
                .into_iter()
                .map(|entry| Submission::attach(self.id, entry, now)),
        );
        self.updated_at = now;
        Ok(())
    }

    /// Checks that deliverables may currently be submitted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// in progress or rejected.
    pub const fn ensure_can_submit(&self) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::UnderReview)
    }

    /// Applies an administrator's review.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// under review.
    pub fn review(
        &mut self,
        decision: ReviewDecision,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let target = decision.target_status();
        self.ensure_transition(target)?;
        let feedback = match decision {
            ReviewDecision::Approve { feedback } => feedback,
            ReviewDecision::Reject { feedback } => Some(feedback),
        };
        self.review_feedback = feedback
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Reassigns a task nobody responded to: restarts the response window,
    /// returns the task to [`TaskStatus::Pending`], and tags the title.
    ///
    /// Time logs are kept.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// pending or unanswered, and [`TaskDomainError::ResponseWindowOpen`]
    /// while the current window is still running.
    pub fn reassign(
        &mut self,
        policy: &LifecyclePolicy,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::Pending)?;
        let now = clock.utc();
        if self.is_response_window_open(policy, now) {
            return Err(TaskDomainError::ResponseWindowOpen(self.id));
        }
        self.title = self.title.mark_reassigned();
        self.status = TaskStatus::Pending;
        self.decline_reason = None;
        self.created_at = now;
        self.updated_at = now;
        Ok(())
    }

    fn switch_activity(
        &mut self,
        target: TaskStatus,
        closing: TimeLogKind,
        opening: TimeLogKind,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(target)?;
        let now = clock.utc();
        if let Some(latest) = self
            .time_logs
            .iter_mut()
            .filter(|log| log.kind() == closing && log.is_open())
            .max_by_key(|log| log.started_at())
        {
            latest.close(now);
        }
        self.status = target;
        self.time_logs.push(TimeLog::open(self.id, opening, now));
        self.updated_at = now;
        Ok(())
    }

    fn close_open_logs(&mut self, at: DateTime<Utc>) {
        for log in &mut self.time_logs {
            log.close(at);
        }
    }

    const fn ensure_transition(&self, target: TaskStatus) -> Result<(), TaskDomainError> {
        if self.status.can_transition_to(target) {
            Ok(())
        } else {
            Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            })
        }
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
