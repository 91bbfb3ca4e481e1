//! Elapsed time formatting for history and session views

use chrono::{DateTime, Utc};

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// Formats `end - start` as days, hours and minutes, e.g. `"2 days 3 hours 15 minutes"`.
///
/// Only non-zero components are emitted. Seconds are truncated. A zero or
/// negative span yields `"0 minutes"`.
pub fn format_duration(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let total_minutes = (end - start).num_minutes().max(0);

    let days = total_minutes / MINUTES_PER_DAY;
    let hours = (total_minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR;
    let minutes = total_minutes % MINUTES_PER_HOUR;

    let parts: Vec<String> = [(days, "day"), (hours, "hour"), (minutes, "minute")]
        .into_iter()
        .filter(|&(count, _)| count > 0)
        .map(|(count, unit)| pluralize(count, unit))
        .collect();

    if parts.is_empty() {
        pluralize(0, "minute")
    } else {
        parts.join(" ")
    }
}

fn pluralize(count: i64, unit: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {unit}{suffix}")
}
