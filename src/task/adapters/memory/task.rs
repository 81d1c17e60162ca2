//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::intern::domain::UserId;
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Each write holds the lock for the whole aggregate, which gives the same
/// all-or-nothing behaviour as the transactional adapter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn newest_first<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<Task> {
    let mut listed: Vec<Task> = tasks.cloned().collect();
    listed.sort_by_key(|task| (Reverse(task.created_at()), task.id()));
    listed
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut tasks = self.state.write().map_err(lock_error)?;
        if tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn store_many(&self, batch: &[Task]) -> TaskRepositoryResult<()> {
        let mut tasks = self.state.write().map_err(lock_error)?;
        if let Some(duplicate) = batch.iter().find(|task| tasks.contains_key(&task.id())) {
            return Err(TaskRepositoryError::DuplicateTask(duplicate.id()));
        }
        for task in batch {
            tasks.insert(task.id(), task.clone());
        }
        Ok(())
    }

    async fn commit(&self, task: &Task, expected: TaskStatus) -> TaskRepositoryResult<Task> {
        let mut tasks = self.state.write().map_err(lock_error)?;
        let slot = tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if slot.status() != expected || slot.lock_version() != task.lock_version() {
            return Err(TaskRepositoryError::StatusConflict {
                task_id: task.id(),
                expected,
                actual: slot.status(),
            });
        }
        let mut committed = task.clone();
        committed.advance_lock_version();
        slot.clone_from(&committed);
        Ok(committed)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let tasks = self.state.read().map_err(lock_error)?;
        Ok(tasks.get(&id).cloned())
    }

    async fn list_by_assignee(&self, assignee: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let tasks = self.state.read().map_err(lock_error)?;
        Ok(newest_first(
            tasks.values().filter(|task| task.assignee_id() == assignee),
        ))
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        let tasks = self.state.read().map_err(lock_error)?;
        Ok(newest_first(tasks.values()))
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut tasks = self.state.write().map_err(lock_error)?;
        tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }
}
