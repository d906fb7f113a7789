//! Wall-clock helpers.
//!
//! Route arithmetic runs on fractional minutes since midnight. Values are
//! only turned back into "HH:MM" for output, and rendering wraps modulo 24 h
//! without a day index: a route that runs past midnight reports an end time
//! that reads earlier than its start.

use chrono::{NaiveTime, Timelike};

use crate::defaults::MINUTES_PER_DAY;
use crate::error::ValidationError;

/// Parse "HH:MM" (or "HH:MM:SS", seconds ignored) into minutes since midnight.
///
/// "24:00" is accepted as the end of the day (1440).
pub fn parse_clock(field: &str, value: &str) -> Result<f64, ValidationError> {
    let trimmed = value.trim();
    if matches!(trimmed, "24:00" | "24:00:00") {
        return Ok(MINUTES_PER_DAY as f64);
    }

    let time = NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidTime {
            field: field.to_string(),
            value: value.to_string(),
        })?;

    Ok(f64::from(time.hour() * 60 + time.minute()))
}

/// Render minutes since midnight as zero-padded "HH:MM".
pub fn format_clock(minutes: f64) -> String {
    let whole = (minutes.round() as i64).rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", whole / 60, whole % 60)
}
