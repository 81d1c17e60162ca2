//! Taskmaster: intern task assignment, work tracking, and performance scoring.
//!
//! Administrators assign tasks to approved interns. Interns accept or decline
//! within a response window, log work by starting, pausing, and resuming, and
//! submit deliverables for review. Work history feeds a leaderboard that
//! merges overlapping work intervals before scoring.
//!
//! # Architecture
//!
//! Taskmaster follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, mail, uploads)
//!
//! # Modules
//!
//! - [`intern`]: User accounts, registration approval, and caller identity
//! - [`task`]: Task lifecycle state machine and time logging
//! - [`performance`]: Work-interval accounting and scoring

pub mod intern;
pub mod performance;
pub mod task;

#[cfg(test)]
pub(crate) mod test_support;
