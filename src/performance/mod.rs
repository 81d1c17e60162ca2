//! Work-interval accounting and intern scoring.
//!
//! Derived metrics are never stored: they are recomputed from task time logs
//! whenever a leaderboard or summary is read.
//!
//! - Accounting and scoring rules in [`domain`]
//! - Read services in [`services`]

pub mod domain;
pub mod services;
