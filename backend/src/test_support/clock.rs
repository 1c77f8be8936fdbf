//! Controllable clock for deterministic timestamps.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Timestamp shared by fixtures across the suite.
    pub fn fixture_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 24, 10, 30, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn at_fixture_time() -> Self {
        Self::new(Self::fixture_time())
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    /// Move forward by `delta`; out-of-range durations are ignored.
    pub fn advance(&self, delta: Duration) {
        if let Ok(delta) = TimeDelta::from_std(delta) {
            *self.lock_clock() += delta;
        }
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}
