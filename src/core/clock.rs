//! Clock capability and date formatting
//!
//! Dates are rendered in UTC with a strftime-compatible pattern.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Timelike, Utc};
use parking_lot::RwLock;
use std::fmt;
use std::fmt::Write;

/// Default date pattern: `2025-01-08 10:30:45`
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Format the current instant with a strftime pattern
    fn format_now(&self, pattern: &str) -> String {
        format_date(&self.now(), pattern)
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use epilog::core::clock::{Clock, FixedClock};
/// use chrono::{TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// let clock = FixedClock::new(start);
/// clock.advance(chrono::Duration::milliseconds(1500));
/// assert_eq!(clock.format_now("%H:%M:%S"), "10:30:46");
/// ```
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write() = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

impl fmt::Debug for FixedClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedClock").field("now", &self.now()).finish()
    }
}

/// Whether every item of a strftime pattern is understood
pub fn is_valid_date_format(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// Format a `DateTime<Utc>` with a strftime pattern.
///
/// A pattern chrono cannot render falls back to [`DEFAULT_DATE_FORMAT`].
pub fn format_date(datetime: &DateTime<Utc>, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", datetime.format(pattern)).is_err() {
        out.clear();
        let _ = write!(out, "{}", datetime.format(DEFAULT_DATE_FORMAT));
    }
    out
}

/// Six-digit microsecond part of an instant
pub fn fraction_digits(datetime: &DateTime<Utc>) -> String {
    format!("{:06}", datetime.nanosecond() % 1_000_000_000 / 1_000)
}

/// Seconds between two instants, never negative
pub fn seconds_between(start: &DateTime<Utc>, end: &DateTime<Utc>) -> f64 {
    let delta = end.signed_duration_since(*start);
    let secs = match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    };
    secs.max(0.0)
}
