//! Calendar time source.
//!
//! "Today" is always derived from an injected clock rather than ambient
//! system calls, so tests can drive day rollover deterministically.

use std::sync::Mutex;

use chrono::{Duration, NaiveDate, Utc};

/// Source of the current UTC calendar date.
pub trait Clock: Send + Sync {
    /// The current date in UTC.
    fn today_utc(&self) -> NaiveDate;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today_utc(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A settable clock for tests.
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    /// A clock pinned to the given date.
    #[must_use]
    pub const fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    /// Pin the clock to a new date.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set(&self, today: NaiveDate) {
        *self.today.lock().expect("clock lock poisoned") = today;
    }

    /// Move the clock forward by whole days.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn advance_days(&self, days: i64) {
        let mut today = self.today.lock().expect("clock lock poisoned");
        *today += Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn today_utc(&self) -> NaiveDate {
        *self.today.lock().expect("clock lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2026, 8, 26).unwrap());
        clock.advance_days(1);
        assert_eq!(
            clock.today_utc(),
            NaiveDate::from_ymd_opt(2026, 8, 27).unwrap()
        );
    }
}
