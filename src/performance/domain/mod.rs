//! Accounting and scoring rules.

mod interval;
mod metrics;
mod policy;
mod score;

pub use interval::{WorkInterval, elapsed_work, merge_intervals, work_intervals};
pub use metrics::{InternStats, InternSummary, TaskWorkMetrics, response_time};
pub use policy::{ScoringPolicy, ScoringWeights};
pub use score::{InternPerformance, rank, score};
