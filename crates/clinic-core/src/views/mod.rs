//! Derived views over repository snapshots.
//!
//! Pure functions, recomputed from scratch on every call. Nothing here
//! fails: a record whose date or reference cannot be resolved is simply
//! left out of the result.

mod kpi;
mod search;
mod timeline;

pub use kpi::*;
pub use search::*;
pub use timeline::*;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a stored date-time as a local wall-clock time.
///
/// Accepts `YYYY-MM-DD HH:MM`, `YYYY-MM-DDTHH:MM` (optionally with seconds
/// and fraction), a bare `YYYY-MM-DD` (midnight) and RFC 3339 strings, which
/// are converted to the local timezone.
pub fn parse_local_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    let normalized = if raw.contains(' ') && !raw.contains('T') {
        raw.replacen(' ', "T", 1)
    } else {
        raw.to_string()
    };

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Epoch milliseconds as local wall-clock time.
pub fn local_datetime_from_millis(millis: i64) -> Option<NaiveDateTime> {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.naive_local())
}

/// Epoch milliseconds of an RFC 3339 timestamp.
pub fn timestamp_millis(raw: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.timestamp_millis())
}
