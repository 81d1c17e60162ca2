//! Intern directory for Taskmaster.
//!
//! Holds the user records that tasks are assigned to, the caller identity
//! threaded into every lifecycle operation, and the administrator approval
//! workflow for intern registrations. The module follows the same hexagonal
//! layout as [`crate::task`]:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
