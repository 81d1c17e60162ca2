//! Port contracts for the intern directory.

pub mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
