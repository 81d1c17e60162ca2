//! Reconstruction of elapsed work time from time log entries.

use super::ScoringPolicy;
use crate::task::domain::{Task, TaskStatus, TimeLogKind};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

/// A closed, non-empty span of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl WorkInterval {
    /// Creates an interval, returning `None` unless `end` is after `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    /// Returns the start.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the end.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns the length of the interval.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// Collects the creditable work intervals of a task.
///
/// Open work entries run until `now` only while the task is in progress;
/// otherwise they are ghosts and are skipped. Each interval is capped at the
/// policy's session length and empty or inverted intervals are dropped.
#[must_use]
pub fn work_intervals(task: &Task, now: DateTime<Utc>, policy: &ScoringPolicy) -> Vec<WorkInterval> {
    let cap = policy.session_cap();
    task.time_logs()
        .iter()
        .filter(|log| log.kind() == TimeLogKind::Work)
        .filter_map(|log| {
            let end = match log.ended_at() {
                Some(ended_at) => ended_at,
                None if task.status() == TaskStatus::InProgress => now,
                None => {
                    debug!(task_id = %task.id(), log_id = %log.id(), "ignoring open work log on inactive task");
                    return None;
                }
            };
            let capped = log
                .started_at()
                .checked_add_signed(cap)
                .map_or(end, |limit| end.min(limit));
            WorkInterval::new(log.started_at(), capped)
        })
        .collect()
}

/// Merges overlapping intervals.
///
/// Intervals that merely touch are kept apart; the total is the same either
/// way. The result is sorted and pairwise disjoint.
#[must_use]
pub fn merge_intervals(mut intervals: Vec<WorkInterval>) -> Vec<WorkInterval> {
    intervals.sort_unstable();
    let mut merged: Vec<WorkInterval> = Vec::with_capacity(intervals.len());
    for next in intervals {
        match merged.last_mut() {
            Some(current) if next.start < current.end => {
                current.end = current.end.max(next.end);
            }
            _ => merged.push(next),
        }
    }
    merged
}

/// Returns the merged work time of a task.
#[must_use]
pub fn elapsed_work(task: &Task, now: DateTime<Utc>, policy: &ScoringPolicy) -> TimeDelta {
    merge_intervals(work_intervals(task, now, policy))
        .iter()
        .map(WorkInterval::duration)
        .fold(TimeDelta::zero(), |total, span| {
            total.checked_add(&span).unwrap_or(TimeDelta::MAX)
        })
}
