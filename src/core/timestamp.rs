//! The `YYYY-MM-DD hh:mm` notice timestamp format.

use chrono::{DateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[012])-(0[1-9]|[12][0-9]|3[01]) ([01][0-9]|2[0-3]):([0-5][0-9])$")
        .expect("static regex compile")
});

/// Format string matching [`is_valid`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Checks the shape of a notice timestamp.
///
/// Only field ranges are enforced (month 01-12, day 01-31, hour 00-23,
/// minute 00-59); `2024-02-31 10:00` is accepted.
#[must_use]
pub fn is_valid(value: &str) -> bool {
    TIMESTAMP_RE.is_match(value)
}

#[must_use]
pub fn format<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Last minute of the calendar day containing `at`.
#[must_use]
pub fn end_of_day<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} 23:59", at.format("%Y-%m-%d"))
}
