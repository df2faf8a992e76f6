//! Relative and absolute time strings used in contest descriptors.
//!
//! Relative times look like `5:00:00`, `-1:00` or `4:59:59.250`; absolute
//! times are ISO-8601 timestamps.

use crate::{ParserError, Result};
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDateTime, TimeZone};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parses a relative time of the form `[+-]H:MM[:SS[.fff]]`.
///
/// # Example
///
/// ```rust
/// use chrono::Duration;
/// use contest_parser::parse_reltime;
///
/// assert_eq!(parse_reltime("5:00:00").unwrap(), Duration::hours(5));
/// assert_eq!(parse_reltime("-1:00").unwrap(), Duration::hours(-1));
/// ```
pub fn parse_reltime(value: &str) -> Result<Duration> {
    let invalid = || ParserError::InvalidTime(value.to_string());
    let trimmed = value.trim();

    let (negative, body) = match trimmed.chars().next() {
        Some('-') => (true, &trimmed[1..]),
        Some('+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let parts: Vec<&str> = body.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(invalid());
    }

    let hours: i64 = parse_digits(parts[0]).ok_or_else(invalid)?;
    let minutes: i64 = parse_digits(parts[1]).ok_or_else(invalid)?;
    if minutes >= 60 {
        return Err(invalid());
    }

    let (seconds, millis) = match parts.get(2) {
        None => (0, 0),
        Some(&field) => {
            let (whole, fraction) = field.split_once('.').unwrap_or((field, ""));
            let seconds: i64 = parse_digits(whole).ok_or_else(invalid)?;
            if seconds >= 60 || fraction.len() > 9 {
                return Err(invalid());
            }
            let millis = if fraction.is_empty() {
                0
            } else {
                let padded = format!("{:0<3}", fraction);
                parse_digits(&padded[..3]).ok_or_else(invalid)?
            };
            (seconds, millis)
        }
    };

    let total = Duration::try_hours(hours)
        .and_then(|total| total.checked_add(&Duration::try_minutes(minutes)?))
        .and_then(|total| total.checked_add(&Duration::try_seconds(seconds)?))
        .and_then(|total| total.checked_add(&Duration::try_milliseconds(millis)?))
        .ok_or_else(invalid)?;

    Ok(if negative { -total } else { total })
}

fn parse_digits(field: &str) -> Option<i64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Formats a duration as `H:MM:SS`, followed by `.mmm` unless `floored`.
///
/// # Example
///
/// ```rust
/// use chrono::Duration;
/// use contest_parser::format_reltime;
///
/// assert_eq!(format_reltime(Duration::hours(5), true), "5:00:00");
/// assert_eq!(format_reltime(Duration::hours(5), false), "5:00:00.000");
/// ```
pub fn format_reltime(duration: Duration, floored: bool) -> String {
    let sign = if duration < Duration::zero() { "-" } else { "" };
    let total_millis = duration.num_milliseconds().unsigned_abs();

    let millis = total_millis % 1000;
    let total_seconds = total_millis / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut out = format!("{}{}:{:02}:{:02}", sign, hours, minutes, seconds);
    if !floored {
        out.push_str(&format!(".{:03}", millis));
    }
    out
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS+HH:MM`.
pub fn format_abstime(time: &DateTime<FixedOffset>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Parses an ISO-8601 timestamp.
///
/// Accepts RFC 3339, basic offsets (`+0200`) and timestamps without an
/// offset, which are read in the local timezone.
pub fn parse_abstime(value: &str) -> Result<DateTime<FixedOffset>> {
    let value = value.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Ok(time);
    }
    if let Ok(time) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z") {
        return Ok(time);
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).single())
        .map(|local| local.fixed_offset())
        .ok_or_else(|| ParserError::InvalidTime(value.to_string()))
}
