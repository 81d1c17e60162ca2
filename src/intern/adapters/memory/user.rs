//! In-memory repository for user records.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::intern::{
    domain::{ApprovalStatus, Role, User, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let mut users = self.state.write().map_err(lock_error)?;
        if users.contains_key(&user.id()) {
            return Err(UserRepositoryError::DuplicateUser(user.id()));
        }
        if users.values().any(|existing| existing.email() == user.email()) {
            return Err(UserRepositoryError::DuplicateEmail(user.email().clone()));
        }
        users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let mut users = self.state.write().map_err(lock_error)?;
        let slot = users
            .get_mut(&user.id())
            .ok_or(UserRepositoryError::NotFound(user.id()))?;
        *slot = user.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let users = self.state.read().map_err(lock_error)?;
        Ok(users.get(&id).cloned())
    }

    async fn list_interns(
        &self,
        approval: Option<ApprovalStatus>,
    ) -> UserRepositoryResult<Vec<User>> {
        let users = self.state.read().map_err(lock_error)?;
        let mut interns: Vec<User> = users
            .values()
            .filter(|user| user.role() == Role::Intern)
            .filter(|user| approval.is_none_or(|status| user.approval() == status))
            .cloned()
            .collect();
        interns.sort_by_key(|user| (user.created_at(), user.id()));
        Ok(interns)
    }
}
