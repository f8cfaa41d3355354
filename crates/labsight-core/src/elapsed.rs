//! Elapsed whole days between a recorded date and "now".
//!
//! Dates without a time component are taken as UTC midnight.  The absolute
//! difference is rounded up to whole days, so a follow-up recorded yesterday
//! afternoon reads as "1 day ago" and a date slightly in the future (clock
//! skew between the recording system and the viewer) still yields a positive
//! count.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use labsight_contracts::error::{LabsightError, LabsightResult};

use crate::traits::Clock;

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// Whole days between `date` (UTC midnight) and `now`, rounded up.
pub fn days_since(date: NaiveDate, now: DateTime<Utc>) -> u64 {
    days_between(date.and_time(NaiveTime::MIN).and_utc(), now)
}

/// Parse `input` and return the elapsed days relative to `clock`.
///
/// Returns `None` when `input` is neither `YYYY-MM-DD` nor RFC 3339, so a
/// view can fall back to showing the raw text.
pub fn days_since_str(input: &str, clock: &dyn Clock) -> Option<u64> {
    match parse_instant(input) {
        Ok(then) => Some(days_between(then, clock.now())),
        Err(e) => {
            debug!(input = %input, error = %e, "cannot compute elapsed days");
            None
        }
    }
}

/// Parse a recorded date or timestamp.
///
/// `YYYY-MM-DD` maps to UTC midnight; RFC 3339 keeps its exact instant.
pub fn parse_instant(input: &str) -> LabsightResult<DateTime<Utc>> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| LabsightError::InvalidDate { input: input.to_string() })
}

fn days_between(then: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = now.signed_duration_since(then).num_milliseconds().unsigned_abs();
    millis.div_ceil(MILLIS_PER_DAY)
}
