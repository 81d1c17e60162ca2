//! Time policy for the task lifecycle.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Policy constants evaluated lazily at transition time.
///
/// # Examples
///
/// ```
/// use taskmaster::task::domain::LifecyclePolicy;
///
/// let policy = LifecyclePolicy::default();
/// assert_eq!(policy.response_window().num_minutes(), 30);
///
/// let relaxed: LifecyclePolicy =
///     serde_json::from_str(r#"{"response_window_secs": 3600}"#).expect("valid policy");
/// assert_eq!(relaxed.response_window().num_minutes(), 60);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecyclePolicy {
    /// Seconds after creation during which the intern may accept or decline.
    pub response_window_secs: i64,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            response_window_secs: 30 * 60,
        }
    }
}

impl LifecyclePolicy {
    /// Returns the response window as a duration.
    #[must_use]
    pub fn response_window(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.response_window_secs).unwrap_or(TimeDelta::MAX)
    }
}
