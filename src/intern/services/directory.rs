//! Service layer for intern registration and approval.

use crate::intern::{
    domain::{AccessDenied, ApprovalStatus, Caller, EmailAddress, User, UserDomainError, UserId},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for intern directory operations.
#[derive(Debug, Error)]
pub enum InternDirectoryError {
    /// The caller may not perform the operation.
    #[error(transparent)]
    Unauthorized(#[from] AccessDenied),
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] UserDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
    /// No user exists with the given identifier.
    #[error("user {0} not found")]
    NotFound(UserId),
}

/// Result type for intern directory operations.
pub type InternDirectoryResult<T> = Result<T, InternDirectoryError>;

/// Intern registration and approval service.
#[derive(Clone)]
pub struct InternDirectoryService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> InternDirectoryService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new intern directory service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers an intern account awaiting approval.
    ///
    /// # Errors
    ///
    /// Returns [`InternDirectoryError`] when the name or email is invalid or
    /// the email is already registered.
    pub async fn register_intern(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> InternDirectoryResult<User> {
        let user = User::register_intern(name, EmailAddress::new(email)?, &*self.clock)?;
        self.repository.store(&user).await?;
        info!(user_id = %user.id(), "intern registered");
        Ok(user)
    }

    /// Creates an administrator account.
    ///
    /// # Errors
    ///
    /// Returns [`InternDirectoryError`] when the name or email is invalid or
    /// the email is already registered.
    pub async fn create_admin(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> InternDirectoryResult<User> {
        let user = User::new_admin(name, EmailAddress::new(email)?, &*self.clock)?;
        self.repository.store(&user).await?;
        Ok(user)
    }

    /// Approves a pending intern registration.
    ///
    /// # Errors
    ///
    /// Returns [`InternDirectoryError::Unauthorized`] for non-administrators,
    /// [`InternDirectoryError::NotFound`] for unknown users, and domain errors
    /// when the registration was already decided.
    pub async fn approve(&self, caller: &Caller, user_id: UserId) -> InternDirectoryResult<User> {
        self.decide(caller, user_id, ApprovalStatus::Approved).await
    }

    /// Rejects a pending intern registration.
    ///
    /// # Errors
    ///
    /// Returns [`InternDirectoryError::Unauthorized`] for non-administrators,
    /// [`InternDirectoryError::NotFound`] for unknown users, and domain errors
    /// when the registration was already decided.
    pub async fn reject(&self, caller: &Caller, user_id: UserId) -> InternDirectoryResult<User> {
        self.decide(caller, user_id, ApprovalStatus::Rejected).await
    }

    async fn decide(
        &self,
        caller: &Caller,
        user_id: UserId,
        decision: ApprovalStatus,
    ) -> InternDirectoryResult<User> {
        caller.ensure_admin()?;
        let mut user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or(InternDirectoryError::NotFound(user_id))?;
        if decision == ApprovalStatus::Approved {
            user.approve(&*self.clock)?;
        } else {
            user.reject(&*self.clock)?;
        }
        self.repository.update(&user).await?;
        info!(user_id = %user_id, approval = decision.as_str(), "intern registration decided");
        Ok(user)
    }

    /// Lists intern accounts, optionally filtered by approval status.
    ///
    /// # Errors
    ///
    /// Returns [`InternDirectoryError::Unauthorized`] for non-administrators
    /// and persistence errors from the repository.
    pub async fn list_interns(
        &self,
        caller: &Caller,
        approval: Option<ApprovalStatus>,
    ) -> InternDirectoryResult<Vec<User>> {
        caller.ensure_admin()?;
        Ok(self.repository.list_interns(approval).await?)
    }

    /// Finds a user visible to the caller: administrators see everyone,
    /// interns only themselves.
    ///
    /// # Errors
    ///
    /// Returns [`InternDirectoryError::Unauthorized`] when an intern looks up
    /// another user, and persistence errors from the repository.
    pub async fn find_user(
        &self,
        caller: &Caller,
        user_id: UserId,
    ) -> InternDirectoryResult<Option<User>> {
        if !caller.is_admin() && caller.user_id() != user_id {
            return Err(AccessDenied::NotOwner {
                caller: caller.user_id(),
                owner: user_id,
            }
            .into());
        }
        Ok(self.repository.find_by_id(user_id).await?)
    }
}
