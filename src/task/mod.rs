//! Task lifecycle management.
//!
//! Administrators assign tasks to approved interns; interns accept or decline
//! within a response window, log work through start, pause, and resume, and
//! submit deliverables for review. The module follows hexagonal architecture:
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
