//! Shared clock fixtures for integration tests.

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Arc, Mutex, PoisonError};

/// Monday 2026-01-05 09:00 UTC.
#[must_use]
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Clock shared between a test and the services under test.
///
/// Clones observe the same instant, so advancing one advances all.
#[derive(Debug, Clone)]
pub struct SharedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl SharedClock {
    /// Creates a clock stopped at [`epoch`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(epoch())),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Default for SharedClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SharedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
