//! Leaderboard and intern summary service.

use crate::intern::{
    domain::{AccessDenied, ApprovalStatus, Caller, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use crate::performance::domain::{
    InternPerformance, InternStats, InternSummary, ScoringPolicy, rank, score,
};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Service-level errors for performance reads.
#[derive(Debug, Error)]
pub enum PerformanceServiceError {
    /// The caller may not read the data.
    #[error(transparent)]
    Unauthorized(#[from] AccessDenied),
    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// User repository operation failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),
    /// No user exists with the given identifier.
    #[error("user {0} not found")]
    UserNotFound(UserId),
}

/// Result type for performance reads.
pub type PerformanceServiceResult<T> = Result<T, PerformanceServiceError>;

/// Computes leaderboards and summaries from stored task history.
#[derive(Clone)]
pub struct PerformanceService<T, U, C>
where
    T: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    users: Arc<U>,
    clock: Arc<C>,
    policy: ScoringPolicy,
}

impl<T, U, C> PerformanceService<T, U, C>
where
    T: TaskRepository,
    U: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default scoring policy.
    #[must_use]
    pub fn new(tasks: Arc<T>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self::with_policy(tasks, users, clock, ScoringPolicy::default())
    }

    /// Creates a service with an explicit scoring policy.
    #[must_use]
    pub const fn with_policy(
        tasks: Arc<T>,
        users: Arc<U>,
        clock: Arc<C>,
        policy: ScoringPolicy,
    ) -> Self {
        Self {
            tasks,
            users,
            clock,
            policy,
        }
    }

    /// Ranks every approved intern.
    ///
    /// # Errors
    ///
    /// Returns [`PerformanceServiceError::Unauthorized`] for
    /// non-administrators and repository errors.
    pub async fn leaderboard(&self, caller: &Caller) -> PerformanceServiceResult<Vec<InternPerformance>> {
        caller.ensure_admin()?;
        let now = self.clock.utc();
        let interns = self
            .users
            .list_interns(Some(ApprovalStatus::Approved))
            .await?;

        let mut rows = Vec::with_capacity(interns.len());
        for intern in interns {
            let assigned = self.tasks.list_by_assignee(intern.id()).await?;
            let stats = InternStats::from_tasks(&assigned, now, &self.policy);
            rows.push(InternPerformance {
                intern_id: intern.id(),
                name: intern.name().to_owned(),
                email: intern.email().as_str().to_owned(),
                score: score(&stats, &self.policy),
                stats,
            });
        }
        debug!(interns = rows.len(), "leaderboard computed");
        Ok(rank(rows))
    }

    /// Summarises one intern's work.
    ///
    /// # Errors
    ///
    /// Returns [`PerformanceServiceError::Unauthorized`] when an intern asks
    /// for someone else, [`PerformanceServiceError::UserNotFound`] for
    /// unknown users, and repository errors.
    pub async fn intern_summary(
        &self,
        caller: &Caller,
        intern_id: UserId,
    ) -> PerformanceServiceResult<InternSummary> {
        caller.ensure_can_view(intern_id)?;
        self.users
            .find_by_id(intern_id)
            .await?
            .ok_or(PerformanceServiceError::UserNotFound(intern_id))?;
        let assigned = self.tasks.list_by_assignee(intern_id).await?;
        Ok(InternSummary::from_tasks(
            intern_id,
            &assigned,
            self.clock.utc(),
            &self.policy,
        ))
    }
}
