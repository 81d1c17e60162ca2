//! Shared world state for task lifecycle BDD scenarios.

use std::sync::Arc;

use crate::test_helpers::SharedClock;
use taskmaster::{
    intern::{
        adapters::memory::InMemoryUserRepository,
        domain::{Caller, User},
        services::InternDirectoryService,
    },
    task::{
        adapters::{
            memory::InMemoryTaskRepository,
            notify::{LoggingMailTransport, MailTaskNotifier},
        },
        domain::Task,
        services::{TaskLifecycleError, TaskLifecycleService},
    },
};
use rstest::fixture;

/// Lifecycle service type used by the BDD world.
pub type TestLifecycleService = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryUserRepository,
    MailTaskNotifier<LoggingMailTransport>,
    SharedClock,
>;

/// Scenario world for task lifecycle behaviour tests.
pub struct TaskLifecycleWorld {
    pub clock: Arc<SharedClock>,
    pub directory: InternDirectoryService<InMemoryUserRepository, SharedClock>,
    pub service: TestLifecycleService,
    pub admin: Option<Caller>,
    pub intern: Option<User>,
    pub task: Option<Task>,
    pub last_result: Option<Result<Task, TaskLifecycleError>>,
}

impl TaskLifecycleWorld {
    /// Creates a world with fresh in-memory stores.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(SharedClock::new());
        let users = Arc::new(InMemoryUserRepository::new());
        Self {
            directory: InternDirectoryService::new(Arc::clone(&users), Arc::clone(&clock)),
            service: TaskLifecycleService::new(
                Arc::new(InMemoryTaskRepository::new()),
                users,
                Arc::new(MailTaskNotifier::new(LoggingMailTransport)),
                Arc::clone(&clock),
            ),
            clock,
            admin: None,
            intern: None,
            task: None,
            last_result: None,
        }
    }

    /// Returns the administrator, failing when none was created.
    pub fn admin(&self) -> Result<Caller, eyre::Report> {
        self.admin
            .ok_or_else(|| eyre::eyre!("missing administrator in scenario world"))
    }

    /// Returns the intern's identity, failing when none was registered.
    pub fn intern_caller(&self) -> Result<Caller, eyre::Report> {
        self.intern
            .as_ref()
            .map(User::as_caller)
            .ok_or_else(|| eyre::eyre!("missing intern in scenario world"))
    }

    /// Returns the current task, failing when none was assigned.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Records an operation result, keeping the task current on success.
    pub fn record(&mut self, result: Result<Task, TaskLifecycleError>) {
        if let Ok(ref updated) = result {
            self.task = Some(updated.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for TaskLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskLifecycleWorld {
    TaskLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
