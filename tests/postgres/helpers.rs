//! Shared helpers for `PostgreSQL` integration tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use pg_embedded_setup_unpriv::TestCluster;
use taskmaster::{
    intern::adapters::postgres::{PostgresUserRepository, UserPgPool},
    task::adapters::postgres::PostgresTaskRepository,
};
use tokio::runtime::Runtime;
use uuid::Uuid;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SQL creating the full schema.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-01-05-000000_create_taskmaster_schema/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "taskmaster_test_template";

/// Creates a current-thread runtime for driving repository futures.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built.
pub fn test_runtime() -> Result<Runtime, BoxError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| Box::new(err) as BoxError)
}

/// Ensures the template database exists with the schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(CREATE_SCHEMA_SQL)
                .map_err(|e| eyre::eyre!("migration failed: {e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Drops the test database when the test finishes, even on panic.
struct CleanupGuard {
    cluster: &'static TestCluster,
    db_name: String,
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        // The cluster's blocking client cannot run on a Tokio worker, and the
        // guard may be dropped inside `block_on`, so drop from a plain thread.
        let connection = self.cluster.connection();
        let result = std::thread::scope(|scope| {
            scope
                .spawn(|| connection.drop_database(self.db_name.as_str()))
                .join()
        });
        if let Ok(Err(err)) = result {
            eprintln!("Warning: failed to drop test database {}: {err}", self.db_name);
        }
    }
}

/// A database cloned from the migrated template, private to one test.
pub struct TestDatabase {
    // Declared before the guard so connections close before the drop.
    pool: UserPgPool,
    _guard: CleanupGuard,
}

impl TestDatabase {
    /// Clones the template into a fresh database and opens a pool on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the template, database or pool cannot be set up.
    pub fn create(cluster: &'static TestCluster) -> Result<Self, BoxError> {
        ensure_template(cluster)?;
        let db_name = format!("taskmaster_test_{}", Uuid::new_v4().simple());
        cluster
            .create_database_from_template(db_name.as_str(), TEMPLATE_DB)
            .map_err(|e| Box::new(e) as BoxError)?;
        let guard = CleanupGuard {
            cluster,
            db_name: db_name.clone(),
        };

        let url = cluster.connection().database_url(&db_name);
        let pool = Pool::builder()
            .max_size(2)
            .build(ConnectionManager::<PgConnection>::new(url))
            .map_err(|e| Box::new(e) as BoxError)?;

        Ok(Self {
            pool,
            _guard: guard,
        })
    }

    /// Returns a task repository bound to this database.
    #[must_use]
    pub fn task_repository(&self) -> PostgresTaskRepository {
        PostgresTaskRepository::new(self.pool.clone())
    }

    /// Returns a user repository bound to this database.
    #[must_use]
    pub fn user_repository(&self) -> PostgresUserRepository {
        PostgresUserRepository::new(self.pool.clone())
    }
}
