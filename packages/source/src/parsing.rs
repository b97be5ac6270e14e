//! Shared parsing utilities for accident exports.
//!
//! Date, time, and composite-coordinate parsing. None of these functions
//! fail: malformed input degrades to `None`.

use std::sync::LazyLock;

use chrono::{Datelike as _, NaiveDate, NaiveTime, Timelike as _};
use crash_stats_accident_models::Weekday;
use crash_stats_source_models::Coordinates;
use regex::Regex;

/// `month/day/year` with 1-2 digit month and day and a 4-digit year.
static MDY_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid regex"));

/// First `H:MM:SS AM` / `H:MM:SS PM` substring anywhere in a time field.
static CLOCK_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+:\d+:\d+ [AP]M").expect("valid regex"));

/// A parenthesized `(lat, lon)` pair.
static PAREN_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*([^,()]+?)\s*,\s*([^,()]+?)\s*\)").expect("valid regex")
});

/// A bare `lat, lon` pair making up the whole field.
static BARE_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^,()]+?)\s*,\s*([^,()]+)$").expect("valid regex"));

/// Temporal fields derived from a date string and a time string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Temporal {
    /// Parsed calendar date.
    pub date: Option<NaiveDate>,
    /// Weekday of `date`.
    pub weekday: Option<Weekday>,
    /// Parsed wall-clock time.
    pub time_of_day: Option<NaiveTime>,
    /// Hour of `time_of_day` on a 24-hour clock.
    pub hour: Option<u32>,
}

/// Parses a `MM/DD/YYYY` date. Returns `None` for any other shape and for
/// impossible calendar dates (month 13, February 30, ...).
#[must_use]
pub fn parse_mdy_date(s: &str) -> Option<NaiveDate> {
    let caps = MDY_DATE_RE.captures(s.trim())?;
    let month = caps[1].parse::<u32>().ok()?;
    let day = caps[2].parse::<u32>().ok()?;
    let year = caps[3].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Locates the first `H:MM:SS AM/PM` substring in `s` and parses it as a
/// 12-hour clock time.
///
/// Leading content such as a repeated date prefix is ignored. Only the
/// first candidate is considered; if it holds out-of-range fields the
/// result is `None`.
#[must_use]
pub fn parse_clock_time(s: &str) -> Option<NaiveTime> {
    let found = CLOCK_TIME_RE.find(s)?;
    NaiveTime::parse_from_str(found.as_str(), "%I:%M:%S %p").ok()
}

/// Derives date, weekday, time of day, and hour from raw date and time
/// fields.
#[must_use]
pub fn normalize_temporal(date: Option<&str>, time: Option<&str>) -> Temporal {
    let date = date.and_then(parse_mdy_date);
    let time_of_day = time.and_then(parse_clock_time);

    Temporal {
        date,
        weekday: date.map(|d| Weekday::from(d.weekday())),
        time_of_day,
        hour: time_of_day.map(|t| t.hour()),
    }
}

/// Extracts a latitude/longitude pair from a composite coordinate string
/// such as `"(39.30, -76.61)"`.
///
/// The pair may be parenthesized (and then located anywhere in the field)
/// or bare (`"39.30, -76.61"`, the whole field). Both components must parse
/// as finite numbers; otherwise neither is returned. Values are not range
/// checked.
#[must_use]
pub fn parse_coordinate_pair(s: &str) -> Option<Coordinates> {
    let mut pairs = PAREN_PAIR_RE.captures_iter(s);
    let caps = match (pairs.next(), pairs.next()) {
        (Some(caps), None) => caps,
        (Some(_), Some(_)) => return None,
        (None, _) => BARE_PAIR_RE.captures(s.trim())?,
    };

    let latitude = parse_degrees(&caps[1])?;
    let longitude = parse_degrees(&caps[2])?;
    Some(Coordinates {
        latitude,
        longitude,
    })
}

fn parse_degrees(s: &str) -> Option<f64> {
    let value = s.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}
