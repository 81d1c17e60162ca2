//! Diesel-backed storage for task aggregates.
//!
//! A task is written with its time logs and submissions in one transaction;
//! status changes are committed with a compare-and-swap on the stored status.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresTaskRepository, TaskPgPool};
