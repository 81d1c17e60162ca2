//! Read services for leaderboards and intern summaries.

mod leaderboard;

pub use leaderboard::{PerformanceService, PerformanceServiceError, PerformanceServiceResult};
