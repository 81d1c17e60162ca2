//! Tunable accounting and scoring constants.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Points awarded or deducted per scoring factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Points per completed task.
    pub completed_task: i64,
    /// Points per whole hour of merged work.
    pub work_hour: i64,
    /// Points per task started within the prompt-start threshold.
    pub prompt_start: i64,
    /// Points deducted per reassigned task.
    pub reassigned_penalty: i64,
    /// Flat bonus for a fast average response.
    pub fast_responder_bonus: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            completed_task: 25,
            work_hour: 2,
            prompt_start: 5,
            reassigned_penalty: 15,
            fast_responder_bonus: 10,
        }
    }
}

/// Accounting and scoring policy.
///
/// # Examples
///
/// ```
/// use taskmaster::performance::domain::ScoringPolicy;
///
/// let policy: ScoringPolicy =
///     serde_json::from_str(r#"{"weights": {"completed_task": 30}}"#).expect("valid policy");
/// assert_eq!(policy.weights.completed_task, 30);
/// assert_eq!(policy.weights.work_hour, 2);
/// assert_eq!(policy.session_cap().num_hours(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Longest credited length of a single work interval, in seconds.
    pub session_cap_secs: i64,
    /// Response time up to which a start counts as prompt, in seconds.
    pub prompt_start_threshold_secs: i64,
    /// Average response, in minutes, below which the fast-responder bonus
    /// applies. The average must also be above zero.
    pub fast_responder_minutes: i64,
    /// Scoring weights.
    pub weights: ScoringWeights,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            session_cap_secs: 12 * 60 * 60,
            prompt_start_threshold_secs: 30 * 60,
            fast_responder_minutes: 15,
            weights: ScoringWeights::default(),
        }
    }
}

impl ScoringPolicy {
    /// Returns the session cap as a duration.
    #[must_use]
    pub fn session_cap(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.session_cap_secs).unwrap_or(TimeDelta::MAX)
    }

    /// Returns the prompt-start threshold as a duration.
    #[must_use]
    pub fn prompt_start_threshold(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.prompt_start_threshold_secs).unwrap_or(TimeDelta::MAX)
    }
}
