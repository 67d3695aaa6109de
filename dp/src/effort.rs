//! Effort duration parsing
//!
//! Turns free-text effort estimates ("2 hours", "30 minutes", "1 day") into
//! minutes for scheduling arithmetic. Unparseable text yields 0 rather than an
//! error; a zero duration means "unknown", not "skip".

use std::sync::LazyLock;

use chrono::{Duration, NaiveDateTime};
use regex::Regex;
use tracing::debug;

/// Minutes per recognised unit
const MINUTES_PER_HOUR: f64 = 60.0;
const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Longest numeric prefix of a token: optional sign, digits with optional
/// fraction (or a bare fraction), optional exponent
static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("numeric prefix regex is valid")
});

/// Extract the leading magnitude: the numeric prefix of the text before the first space
fn leading_magnitude(text: &str) -> Option<f64> {
    let token = text.split(' ').next().unwrap_or("");
    let prefix = NUMERIC_PREFIX.find(token)?.as_str();
    let value: f64 = prefix.parse().ok()?;
    value.is_finite().then_some(value)
}

/// Parse an effort descriptor into minutes
///
/// Units are matched case-insensitively anywhere in the text, checked in the
/// order hour, minute, day. Text without a unit is taken as minutes.
pub fn parse_duration_minutes(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    let lower = text.to_lowercase();
    let Some(value) = leading_magnitude(&lower) else {
        debug!(%text, "parse_duration_minutes: no leading number, treating as 0");
        return 0.0;
    };

    let minutes = if lower.contains("hour") {
        value * MINUTES_PER_HOUR
    } else if lower.contains("minute") {
        value
    } else if lower.contains("day") {
        value * MINUTES_PER_DAY
    } else {
        value
    };

    if minutes.is_finite() { minutes } else { 0.0 }
}

/// True when the text carries a leading number the parser can use
///
/// Form validation rejects effort text that fails this check before it
/// reaches the planner.
pub fn is_well_formed(text: &str) -> bool {
    leading_magnitude(&text.to_lowercase()).is_some()
}

/// Convert fractional minutes to a chrono duration at millisecond precision
pub fn minutes_to_duration(minutes: f64) -> Duration {
    // `as` saturates; i64::MIN itself is outside chrono's range
    let millis = ((minutes * 60_000.0).round() as i64).max(-i64::MAX);
    Duration::milliseconds(millis)
}

/// End of a task window: start plus the parsed effort, saturating at the calendar bounds
pub fn end_time(start: NaiveDateTime, effort: &str) -> NaiveDateTime {
    let duration = minutes_to_duration(parse_duration_minutes(effort));
    start.checked_add_signed(duration).unwrap_or(if duration < Duration::zero() {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    })
}
