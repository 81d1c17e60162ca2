//! Service layer orchestrating the task lifecycle.

use crate::intern::{
    domain::{AccessDenied, ApprovalStatus, Caller, User, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use crate::task::{
    domain::{
        LifecyclePolicy, NewSubmission, NewTaskData, RespondOutcome, ReviewDecision, Task,
        TaskDomainError, TaskId, TaskPriority, TaskResponse, TaskStatus, TaskTitle,
    },
    ports::{
        AssetUploadError, TaskAssignmentNotice, TaskNotifier, TaskRepository, TaskRepositoryError,
    },
};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Who a new task is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAssignee {
    /// A single approved intern.
    Intern(UserId),
    /// One copy of the task for every approved intern.
    AllApprovedInterns,
}

/// Request payload for creating tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    priority: TaskPriority,
    deadline: DateTime<Utc>,
    assignee: TaskAssignee,
}

impl CreateTaskRequest {
    /// Creates a request with required fields and medium priority.
    #[must_use]
    pub fn new(title: impl Into<String>, deadline: DateTime<Utc>, assignee: TaskAssignee) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: TaskPriority::Medium,
            deadline,
            assignee,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }
}

/// Remaining response time for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseCountdown {
    /// Task the countdown belongs to.
    pub task_id: TaskId,
    /// Status after any expiry was applied.
    pub status: TaskStatus,
    /// Time left to respond; zero once the window has closed.
    pub remaining: TimeDelta,
}

impl ResponseCountdown {
    /// Returns the remaining time in whole seconds.
    #[must_use]
    pub const fn remaining_secs(&self) -> i64 {
        self.remaining.num_seconds()
    }
}

/// Task counts per status for the administrator dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    counts: BTreeMap<TaskStatus, usize>,
}

impl DashboardSummary {
    fn from_tasks(tasks: &[Task]) -> Self {
        let mut counts = BTreeMap::new();
        for task in tasks {
            *counts.entry(task.status()).or_insert(0_usize) += 1;
        }
        Self { counts }
    }

    /// Returns the number of tasks in `status`.
    #[must_use]
    pub fn count(&self, status: TaskStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    /// Returns the total number of tasks.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Iterates over non-zero counts in status order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, usize)> + '_ {
        self.counts.iter().map(|(status, count)| (*status, *count))
    }
}

/// Coarse classification of lifecycle failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskLifecycleErrorKind {
    /// The caller may not perform the operation.
    Unauthorized,
    /// A task or user does not exist.
    NotFound,
    /// The current status does not permit the operation.
    InvalidTransition,
    /// The response window closed; the task was moved to no-response.
    ExpiredWindow,
    /// Input failed validation.
    Validation,
    /// Another writer changed the task first.
    Conflict,
    /// A collaborator failed.
    Infrastructure,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The caller may not perform the operation.
    #[error(transparent)]
    Unauthorized(#[from] AccessDenied),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    /// No user exists with the given identifier.
    #[error("user {0} not found")]
    UserNotFound(UserId),
    /// The assignee is not an approved intern.
    #[error("user {0} is not an approved intern")]
    InvalidAssignee(UserId),
    /// A fan-out assignment found no approved interns.
    #[error("there are no approved interns to assign")]
    NoAssignableInterns,
    /// The response window had closed; the task is now unanswered.
    #[error("response window for task {0} has expired")]
    ExpiredWindow(TaskId),
    /// Another writer changed the task first.
    #[error("task {task_id} was modified concurrently (now {})", actual.as_str())]
    Conflict {
        /// Task whose write lost the race.
        task_id: TaskId,
        /// Status currently stored.
        actual: TaskStatus,
    },
    /// Domain validation or transition check failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
    /// User repository operation failed.
    #[error(transparent)]
    UserRepository(#[from] UserRepositoryError),
    /// Upload credentials could not be issued.
    #[error(transparent)]
    Upload(#[from] AssetUploadError),
}

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(task_id) => Self::TaskNotFound(task_id),
            TaskRepositoryError::StatusConflict {
                task_id, actual, ..
            } => Self::Conflict { task_id, actual },
            other => Self::Repository(other),
        }
    }
}

impl TaskLifecycleError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> TaskLifecycleErrorKind {
        match self {
            Self::Unauthorized(_) => TaskLifecycleErrorKind::Unauthorized,
            Self::TaskNotFound(_) | Self::UserNotFound(_) => TaskLifecycleErrorKind::NotFound,
            Self::ExpiredWindow(_) => TaskLifecycleErrorKind::ExpiredWindow,
            Self::Conflict { .. } => TaskLifecycleErrorKind::Conflict,
            Self::InvalidAssignee(_) | Self::NoAssignableInterns => {
                TaskLifecycleErrorKind::Validation
            }
            Self::Domain(err) if err.is_validation() => TaskLifecycleErrorKind::Validation,
            Self::Domain(_) => TaskLifecycleErrorKind::InvalidTransition,
            Self::Repository(_) | Self::UserRepository(_) | Self::Upload(_) => {
                TaskLifecycleErrorKind::Infrastructure
            }
        }
    }

    /// Returns `true` when the response window had closed.
    #[must_use]
    pub const fn is_expired_window(&self) -> bool {
        matches!(self.kind(), TaskLifecycleErrorKind::ExpiredWindow)
    }

    /// Returns `true` when the caller is not allowed to act.
    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        matches!(self.kind(), TaskLifecycleErrorKind::Unauthorized)
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Each operation loads one task, applies one domain transition, and commits
/// it with a compare-and-swap on the status and lock version it was loaded
/// with.
#[derive(Clone)]
pub struct TaskLifecycleService<R, U, N, C>
where
    R: TaskRepository,
    U: UserRepository,
    N: TaskNotifier,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    users: Arc<U>,
    notifier: Arc<N>,
    clock: Arc<C>,
    policy: LifecyclePolicy,
}

impl<R, U, N, C> TaskLifecycleService<R, U, N, C>
where
    R: TaskRepository,
    U: UserRepository,
    N: TaskNotifier,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service with the default policy.
    #[must_use]
    pub fn new(repository: Arc<R>, users: Arc<U>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self::with_policy(repository, users, notifier, clock, LifecyclePolicy::default())
    }

    /// Creates a new task lifecycle service with an explicit policy.
    #[must_use]
    pub const fn with_policy(
        repository: Arc<R>,
        users: Arc<U>,
        notifier: Arc<N>,
        clock: Arc<C>,
        policy: LifecyclePolicy,
    ) -> Self {
        Self {
            repository,
            users,
            notifier,
            clock,
            policy,
        }
    }

    /// Returns the active lifecycle policy.
    #[must_use]
    pub const fn policy(&self) -> &LifecyclePolicy {
        &self.policy
    }

    /// Creates one task per assignee and notifies each recipient.
    ///
    /// Notification is best-effort: failures are logged and never undo the
    /// assignment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`] for non-administrators,
    /// [`TaskLifecycleError::UserNotFound`] or
    /// [`TaskLifecycleError::InvalidAssignee`] for a bad assignee, and domain
    /// errors for an empty title.
    pub async fn create_task(
        &self,
        caller: &Caller,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Vec<Task>> {
        caller.ensure_admin()?;
        let title = TaskTitle::new(request.title)?;
        let recipients = self.resolve_assignees(request.assignee).await?;

        let tasks: Vec<Task> = recipients
            .iter()
            .map(|intern| {
                Task::new(
                    NewTaskData {
                        title: title.clone(),
                        description: request.description.clone(),
                        priority: request.priority,
                        deadline: request.deadline,
                        assignee_id: intern.id(),
                        creator_id: caller.user_id(),
                    },
                    &*self.clock,
                )
            })
            .collect();
        self.repository.store_many(&tasks).await?;

        for (task, intern) in tasks.iter().zip(&recipients) {
            info!(task_id = %task.id(), assignee = %intern.id(), "task assigned");
            self.notify_assignment(task, intern).await;
        }
        Ok(tasks)
    }

    /// Records the assignee's response to a pending task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::ExpiredWindow`] once the window has
    /// closed (the task is persisted as no-response first),
    /// [`TaskLifecycleError::Unauthorized`] for anyone but the assignee, and
    /// domain errors for a blank decline reason or a non-pending task.
    pub async fn respond(
        &self,
        caller: &Caller,
        task_id: TaskId,
        response: TaskResponse,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        caller.ensure_acts_for(task.assignee_id())?;
        let expected = task.status();

        let outcome = task.respond(response, &self.policy, &*self.clock)?;
        if task.status() != expected {
            task = self.repository.commit(&task, expected).await?;
        }
        match outcome {
            RespondOutcome::Recorded => {
                info!(task_id = %task_id, status = task.status().as_str(), "task response recorded");
                Ok(task)
            }
            RespondOutcome::WindowExpired => {
                warn!(task_id = %task_id, "response after window closed; task marked no_response");
                Err(TaskLifecycleError::ExpiredWindow(task_id))
            }
        }
    }

    /// Starts work on an accepted task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`] for anyone but the
    /// assignee, domain errors when the status does not permit starting, and
    /// [`TaskLifecycleError::Conflict`] when a concurrent start won.
    pub async fn start(&self, caller: &Caller, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.act_as_assignee(caller, task_id, |task, clock| task.start(clock))
            .await
    }

    /// Pauses work on a task in progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`] for anyone but the
    /// assignee and domain errors unless the task is in progress.
    pub async fn pause(&self, caller: &Caller, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.act_as_assignee(caller, task_id, |task, clock| task.pause(clock))
            .await
    }

    /// Resumes work on a paused task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`] for anyone but the
    /// assignee and domain errors unless the task is paused.
    pub async fn resume(&self, caller: &Caller, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.act_as_assignee(caller, task_id, |task, clock| task.resume(clock))
            .await
    }

    /// Submits deliverables for review.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`] for anyone but the
    /// assignee, and domain errors for an empty batch or when the task is
    /// neither in progress nor rejected.
    pub async fn submit(
        &self,
        caller: &Caller,
        task_id: TaskId,
        entries: Vec<NewSubmission>,
    ) -> TaskLifecycleResult<Task> {
        self.act_as_assignee(caller, task_id, move |task, clock| {
            task.submit(entries, clock)
        })
        .await
    }

    /// Applies an administrator's review to submitted work.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`] for non-administrators and
    /// domain errors unless the task is under review.
    pub async fn review(
        &self,
        caller: &Caller,
        task_id: TaskId,
        decision: ReviewDecision,
    ) -> TaskLifecycleResult<Task> {
        caller.ensure_admin()?;
        if decision.is_unexplained_rejection() {
            warn!(task_id = %task_id, "task rejected without feedback");
        }
        self.apply(task_id, move |task, clock| task.review(decision, clock))
            .await
    }

    /// Returns an unanswered task to its assignee with a fresh window.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`] for non-administrators and
    /// domain errors while the window is still open or when the task is not
    /// pending or unanswered.
    pub async fn reassign(&self, caller: &Caller, task_id: TaskId) -> TaskLifecycleResult<Task> {
        caller.ensure_admin()?;
        let policy = self.policy;
        self.apply(task_id, move |task, clock| task.reassign(&policy, clock))
            .await
    }

    /// Deletes a task with its time logs and submissions.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`] for non-administrators and
    /// [`TaskLifecycleError::TaskNotFound`] for unknown tasks.
    pub async fn delete(&self, caller: &Caller, task_id: TaskId) -> TaskLifecycleResult<()> {
        caller.ensure_admin()?;
        self.repository.delete(task_id).await?;
        info!(task_id = %task_id, "task deleted");
        Ok(())
    }

    /// Finds a task visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks and
    /// [`TaskLifecycleError::Unauthorized`] when an intern looks at another
    /// intern's task.
    pub async fn find_task(&self, caller: &Caller, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let task = self.load(task_id).await?;
        caller.ensure_can_view(task.assignee_id())?;
        Ok(task)
    }

    /// Lists an intern's tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`] when an intern lists
    /// another intern's tasks.
    pub async fn list_tasks_for_intern(
        &self,
        caller: &Caller,
        intern_id: UserId,
    ) -> TaskLifecycleResult<Vec<Task>> {
        caller.ensure_can_view(intern_id)?;
        Ok(self.repository.list_by_assignee(intern_id).await?)
    }

    /// Lists every task, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`] for non-administrators.
    pub async fn list_all_tasks(&self, caller: &Caller) -> TaskLifecycleResult<Vec<Task>> {
        caller.ensure_admin()?;
        Ok(self.repository.list_all().await?)
    }

    /// Reports the time left to respond to a task.
    ///
    /// A pending task found past its window is persisted as no-response on
    /// the way.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks and
    /// [`TaskLifecycleError::Unauthorized`] when an intern looks at another
    /// intern's task.
    pub async fn response_countdown(
        &self,
        caller: &Caller,
        task_id: TaskId,
    ) -> TaskLifecycleResult<ResponseCountdown> {
        let mut task = self.load(task_id).await?;
        caller.ensure_can_view(task.assignee_id())?;

        if task.expire_response_window(&self.policy, &*self.clock) {
            match self.repository.commit(&task, TaskStatus::Pending).await {
                Ok(committed) => {
                    warn!(task_id = %task_id, "response window elapsed; task marked no_response");
                    task = committed;
                }
                Err(TaskRepositoryError::StatusConflict { .. }) => {
                    task = self.load(task_id).await?;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(ResponseCountdown {
            task_id,
            status: task.status(),
            remaining: task.response_time_remaining(&self.policy, self.clock.utc()),
        })
    }

    /// Counts tasks per status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`] for non-administrators.
    pub async fn dashboard_summary(&self, caller: &Caller) -> TaskLifecycleResult<DashboardSummary> {
        caller.ensure_admin()?;
        let tasks = self.repository.list_all().await?;
        Ok(DashboardSummary::from_tasks(&tasks))
    }

    async fn resolve_assignees(&self, assignee: TaskAssignee) -> TaskLifecycleResult<Vec<User>> {
        match assignee {
            TaskAssignee::Intern(intern_id) => {
                let intern = self
                    .users
                    .find_by_id(intern_id)
                    .await?
                    .ok_or(TaskLifecycleError::UserNotFound(intern_id))?;
                if !intern.is_assignable() {
                    return Err(TaskLifecycleError::InvalidAssignee(intern_id));
                }
                Ok(vec![intern])
            }
            TaskAssignee::AllApprovedInterns => {
                let interns = self
                    .users
                    .list_interns(Some(ApprovalStatus::Approved))
                    .await?;
                if interns.is_empty() {
                    return Err(TaskLifecycleError::NoAssignableInterns);
                }
                Ok(interns)
            }
        }
    }

    async fn notify_assignment(&self, task: &Task, intern: &User) {
        let notice = TaskAssignmentNotice {
            task_id: task.id(),
            title: task.title().as_str().to_owned(),
            description: task.description().to_owned(),
            priority: task.priority(),
            deadline: task.deadline(),
            intern_name: intern.name().to_owned(),
            intern_email: intern.email().as_str().to_owned(),
        };
        if let Err(err) = self.notifier.send_task_assignment(&notice).await {
            warn!(task_id = %task.id(), error = %err, "assignment notification failed");
        }
    }

    async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }

    async fn act_as_assignee<F>(
        &self,
        caller: &Caller,
        task_id: TaskId,
        transition: F,
    ) -> TaskLifecycleResult<Task>
    where
        F: FnOnce(&mut Task, &C) -> Result<(), TaskDomainError>,
    {
        let task = self.load(task_id).await?;
        caller.ensure_acts_for(task.assignee_id())?;
        self.commit_transition(task, transition).await
    }

    async fn apply<F>(&self, task_id: TaskId, transition: F) -> TaskLifecycleResult<Task>
    where
        F: FnOnce(&mut Task, &C) -> Result<(), TaskDomainError>,
    {
        let task = self.load(task_id).await?;
        self.commit_transition(task, transition).await
    }

    async fn commit_transition<F>(&self, mut task: Task, transition: F) -> TaskLifecycleResult<Task>
    where
        F: FnOnce(&mut Task, &C) -> Result<(), TaskDomainError>,
    {
        let expected = task.status();
        transition(&mut task, &*self.clock)?;
        let task = self.repository.commit(&task, expected).await?;
        info!(
            task_id = %task.id(),
            from = expected.as_str(),
            to = task.status().as_str(),
            "task transitioned"
        );
        Ok(task)
    }
}
