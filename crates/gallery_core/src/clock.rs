//! Creation-time stamps for posts.

use chrono::{Local, NaiveDateTime, TimeDelta};
use parking_lot::Mutex;

/// Sortable timestamp format, e.g. `20250314_101500.123456`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%.6f";

/// Second-resolution format written by earlier versions.
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Human-readable display format, e.g. `2025-03-14 10:15:00`.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The two renderings of one creation instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    /// Lexically sortable form
    pub timestamp: String,
    /// Display form
    pub datetime: String,
}

/// Issues strictly increasing local-time stamps.
///
/// If the wall clock steps backwards, or two posts land in the same
/// microsecond, the clock advances one microsecond past the last value it
/// handed out.
///
/// # Examples
///
/// ```
/// use gallery_core::TimestampClock;
///
/// let clock = TimestampClock::new();
/// let first = clock.stamp();
/// let second = clock.stamp();
/// assert!(second.timestamp > first.timestamp);
/// ```
#[derive(Debug, Default)]
pub struct TimestampClock {
    last: Mutex<Option<NaiveDateTime>>,
}

impl TimestampClock {
    /// Create a clock with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next stamp, taken from the local wall clock.
    pub fn stamp(&self) -> Stamp {
        self.stamp_at(Local::now().naive_local())
    }

    /// Next stamp, given the current wall-clock reading.
    pub fn stamp_at(&self, now: NaiveDateTime) -> Stamp {
        let mut last = self.last.lock();
        let instant = match *last {
            Some(previous) if now <= previous => previous + TimeDelta::microseconds(1),
            _ => now,
        };
        *last = Some(instant);

        Stamp {
            timestamp: instant.format(TIMESTAMP_FORMAT).to_string(),
            datetime: instant.format(DATETIME_FORMAT).to_string(),
        }
    }

    /// Never issue a stamp at or below `timestamp`.
    ///
    /// Used with the newest stored timestamp so stamps keep increasing across
    /// restarts, wall-clock rollbacks and other processes writing the same
    /// store. Accepts both the fractional and the legacy second-resolution
    /// form; anything else is ignored.
    pub fn resume_after(&self, timestamp: &str) {
        let parsed = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(timestamp, LEGACY_TIMESTAMP_FORMAT));
        let Ok(stored) = parsed else {
            tracing::debug!(timestamp = %timestamp, "Ignoring unparseable stored timestamp");
            return;
        };

        let mut last = self.last.lock();
        if last.is_none_or(|previous| stored > previous) {
            *last = Some(stored);
        }
    }
}
