//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DATE_PREFIX_RE: Regex = Regex::new(r"^(\d{4}-\d{2}-\d{2})-(.+)$").unwrap();
}

/// Default display pattern for dates
pub const DEFAULT_DATE_FORMAT: &str = "%B %d, %Y";

/// Split a `YYYY-MM-DD-slug` file stem into its date and the rest.
///
/// The date is `None` when the prefix has the right shape but is not a real
/// calendar date; the slug is still split off.
pub fn split_date_prefix(stem: &str) -> Option<(Option<NaiveDate>, &str)> {
    let caps = DATE_PREFIX_RE.captures(stem)?;
    let date = NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%Y-%m-%d").ok();
    let rest = caps.get(2)?.as_str();
    Some((date, rest))
}

/// Parse a date string in the formats front-matter commonly uses
pub fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Format a date with a strftime pattern
pub fn format_date(date: &NaiveDateTime, format: &str) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    // chrono reports bad patterns through fmt::Error rather than panicking here
    if write!(out, "{}", date.format(format)).is_err() {
        return date.format(DEFAULT_DATE_FORMAT).to_string();
    }
    out
}
