//! Dispute age: signed whole days from transaction to dispute.
//!
//! An unparsable or missing date makes the age unknown. Unknown is never
//! inside the policy window. A negative age (dispute before transaction)
//! is inside the window.

use crate::types::{AgeDays, MS_PER_DAY};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub const POLICY_WINDOW_DAYS: AgeDays = 60;

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a date or date-time string into a UTC instant.
/// Values without an offset are taken as UTC; bare dates as UTC midnight.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

/// Dispute date minus transaction date, in days, rounded half up.
pub fn days_between(transaction: Option<&str>, dispute: Option<&str>) -> Option<AgeDays> {
    let tx = parse_instant(transaction?)?;
    let disputed = parse_instant(dispute?)?;
    let diff_ms = (disputed - tx).num_milliseconds();
    Some(round_half_up(diff_ms as f64 / MS_PER_DAY as f64))
}

pub fn within_policy_window(age: Option<AgeDays>) -> bool {
    matches!(age, Some(days) if days <= POLICY_WINDOW_DAYS)
}

fn round_half_up(x: f64) -> AgeDays {
    (x + 0.5).floor() as AgeDays
}
