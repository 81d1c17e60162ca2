//! Scoring formula and leaderboard ordering.

use super::{InternStats, ScoringPolicy};
use crate::intern::domain::UserId;
use std::cmp::Reverse;

fn as_points(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Computes an intern's score, never below zero.
///
/// ```text
/// completed × 25 + hours × 2 + prompt starts × 5 − reassigned × 15
///   + 10 when 0 < average response minutes < 15
/// ```
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use taskmaster::performance::domain::{InternStats, ScoringPolicy, score};
///
/// let stats = InternStats {
///     completed: 2,
///     total_work: TimeDelta::hours(10),
///     reassigned: 1,
///     prompt_starts: 3,
///     avg_response_minutes: 8,
/// };
/// assert_eq!(score(&stats, &ScoringPolicy::default()), 80);
/// ```
#[must_use]
pub fn score(stats: &InternStats, policy: &ScoringPolicy) -> u64 {
    let weights = &policy.weights;
    let fast_responder = stats.avg_response_minutes > 0
        && stats.avg_response_minutes < policy.fast_responder_minutes;

    let raw = weights
        .completed_task
        .saturating_mul(as_points(stats.completed))
        .saturating_add(weights.work_hour.saturating_mul(stats.hours()))
        .saturating_add(weights.prompt_start.saturating_mul(as_points(stats.prompt_starts)))
        .saturating_sub(
            weights
                .reassigned_penalty
                .saturating_mul(as_points(stats.reassigned)),
        )
        .saturating_add(if fast_responder {
            weights.fast_responder_bonus
        } else {
            0
        });
    u64::try_from(raw).unwrap_or(0)
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternPerformance {
    /// Intern identifier.
    pub intern_id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Score inputs.
    pub stats: InternStats,
    /// Final score.
    pub score: u64,
}

/// Orders rows by descending score, breaking ties by intern id.
#[must_use]
pub fn rank(mut rows: Vec<InternPerformance>) -> Vec<InternPerformance> {
    rows.sort_by_key(|row| (Reverse(row.score), row.intern_id));
    rows
}
