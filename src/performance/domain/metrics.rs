//! Per-task and per-intern work metrics.

use super::{ScoringPolicy, elapsed_work};
use crate::intern::domain::UserId;
use crate::task::domain::{Task, TaskId, TaskStatus, TimeLogKind};
use chrono::{DateTime, TimeDelta, Utc};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Time from assignment to the first recorded work, when that is positive.
///
/// Every work entry counts here, including ghosts; only the earliest start
/// matters.
#[must_use]
pub fn response_time(task: &Task) -> Option<TimeDelta> {
    task.time_logs()
        .iter()
        .filter(|log| log.kind() == TimeLogKind::Work)
        .map(|log| log.started_at())
        .min()
        .map(|first_start| first_start - task.created_at())
        .filter(|delay| *delay > TimeDelta::zero())
}

fn count_u64(count: usize) -> u64 {
    u64::try_from(count).unwrap_or(u64::MAX)
}

fn sum_durations(durations: impl IntoIterator<Item = TimeDelta>) -> TimeDelta {
    durations.into_iter().fold(TimeDelta::zero(), |total, span| {
        total.checked_add(&span).unwrap_or(TimeDelta::MAX)
    })
}

/// Aggregate inputs to an intern's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternStats {
    /// Tasks approved by an administrator.
    pub completed: u64,
    /// Merged work time across all tasks.
    pub total_work: TimeDelta,
    /// Tasks whose title carries the reassignment marker.
    pub reassigned: u64,
    /// Tasks first started within the prompt-start threshold.
    pub prompt_starts: u64,
    /// Floor of the mean positive response time, in minutes; zero without
    /// any measured response.
    pub avg_response_minutes: i64,
}

impl Default for InternStats {
    fn default() -> Self {
        Self {
            completed: 0,
            total_work: TimeDelta::zero(),
            reassigned: 0,
            prompt_starts: 0,
            avg_response_minutes: 0,
        }
    }
}

impl InternStats {
    /// Derives stats from an intern's tasks as of `now`.
    #[must_use]
    pub fn from_tasks(tasks: &[Task], now: DateTime<Utc>, policy: &ScoringPolicy) -> Self {
        let responses: Vec<TimeDelta> = tasks.iter().filter_map(response_time).collect();
        let threshold = policy.prompt_start_threshold();

        Self {
            completed: count_u64(
                tasks
                    .iter()
                    .filter(|task| task.status() == TaskStatus::Completed)
                    .count(),
            ),
            total_work: sum_durations(tasks.iter().map(|task| elapsed_work(task, now, policy))),
            reassigned: count_u64(tasks.iter().filter(|task| task.is_reassigned()).count()),
            prompt_starts: count_u64(responses.iter().filter(|delay| **delay <= threshold).count()),
            avg_response_minutes: average_minutes(&responses),
        }
    }

    /// Returns whole hours of merged work.
    #[must_use]
    pub const fn hours(&self) -> i64 {
        self.total_work.num_hours()
    }

    /// Returns merged work in whole seconds.
    #[must_use]
    pub const fn total_work_secs(&self) -> i64 {
        self.total_work.num_seconds()
    }
}

fn average_minutes(responses: &[TimeDelta]) -> i64 {
    let Ok(count) = i64::try_from(responses.len()) else {
        return 0;
    };
    if count == 0 {
        return 0;
    }
    let total_ms = responses
        .iter()
        .fold(0_i64, |total, delay| total.saturating_add(delay.num_milliseconds()));
    total_ms.div_euclid(count.saturating_mul(MILLIS_PER_MINUTE))
}

/// Work time credited to one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskWorkMetrics {
    /// Task identifier.
    pub task_id: TaskId,
    /// Task title.
    pub title: String,
    /// Task status.
    pub status: TaskStatus,
    /// Merged work time.
    pub elapsed: TimeDelta,
}

/// Per-intern detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternSummary {
    /// Intern the summary describes.
    pub intern_id: UserId,
    /// Completed tasks.
    pub completed: u64,
    /// Tasks still awaiting action: pending, in progress, or under review.
    pub pending: u64,
    /// Merged work time across all tasks.
    pub total_work: TimeDelta,
    /// Per-task breakdown in the order given.
    pub tasks: Vec<TaskWorkMetrics>,
}

impl InternSummary {
    /// Builds the summary for `intern_id` from its tasks as of `now`.
    #[must_use]
    pub fn from_tasks(
        intern_id: UserId,
        tasks: &[Task],
        now: DateTime<Utc>,
        policy: &ScoringPolicy,
    ) -> Self {
        let breakdown: Vec<TaskWorkMetrics> = tasks
            .iter()
            .map(|task| TaskWorkMetrics {
                task_id: task.id(),
                title: task.title().as_str().to_owned(),
                status: task.status(),
                elapsed: elapsed_work(task, now, policy),
            })
            .collect();
        let count_status = |wanted: &[TaskStatus]| {
            count_u64(
                tasks
                    .iter()
                    .filter(|task| wanted.contains(&task.status()))
                    .count(),
            )
        };

        Self {
            intern_id,
            completed: count_status(&[TaskStatus::Completed]),
            pending: count_status(&[
                TaskStatus::Pending,
                TaskStatus::InProgress,
                TaskStatus::UnderReview,
            ]),
            total_work: sum_durations(breakdown.iter().map(|metrics| metrics.elapsed)),
            tasks: breakdown,
        }
    }

    /// Returns merged work in whole seconds.
    #[must_use]
    pub const fn total_work_secs(&self) -> i64 {
        self.total_work.num_seconds()
    }
}
