//! Display formatting shared by the dashboard pages and the CLI tables.

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
#[must_use]
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Human distance between `at` and `now` with a direction suffix,
/// e.g. `"5 minutes ago"` or `"in about 2 hours"`.
///
/// Buckets follow the usual "time ago" thresholds: under 45 seconds reads as
/// less than a minute, minutes round to the nearest whole minute, hours and
/// longer are prefixed with "about" where the value is approximate.
#[must_use]
pub fn format_relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(at).num_seconds();
    let distance = describe_distance(delta.abs());
    if delta >= 0 {
        format!("{distance} ago")
    } else {
        format!("in {distance}")
    }
}

fn describe_distance(secs: i64) -> String {
    let round = |unit: i64| (secs + unit / 2) / unit;

    if secs < 45 {
        "less than a minute".to_string()
    } else if secs < 90 {
        "1 minute".to_string()
    } else if secs < 45 * MINUTE {
        format!("{} minutes", round(MINUTE))
    } else if secs < 90 * MINUTE {
        "about 1 hour".to_string()
    } else if secs < DAY {
        format!("about {} hours", round(HOUR))
    } else if secs < 42 * HOUR {
        "1 day".to_string()
    } else if secs < MONTH {
        format!("{} days", round(DAY))
    } else if secs < 45 * DAY {
        "about 1 month".to_string()
    } else if secs < YEAR {
        format!("{} months", round(MONTH))
    } else {
        match round(YEAR) {
            1 => "about 1 year".to_string(),
            n => format!("about {n} years"),
        }
    }
}

/// Cuts `text` to at most `max_chars` characters, appending `...` when cut.
///
/// Counts Unicode scalar values so CJK titles are never split mid-character.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
