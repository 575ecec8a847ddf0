//! Timestamp and period aliases plus lenient parsing for both.
//!
//! Reference times and valid times are UTC instants; forecast periods
//! (lead times) are signed durations, although axes only ever hold
//! non-negative ones.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use thiserror::Error;

/// A forecast reference time or valid time.
pub type Timestamp = DateTime<Utc>;

/// A forecast period (lead time) measured from the reference time.
pub type Period = TimeDelta;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Errors raised while parsing timestamp-like or period-like text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid timestamp '{0}'")]
    Timestamp(String),

    #[error("invalid period '{0}' (expected e.g. \"32h\", \"1d6h\", \"90m\" or \"0\")")]
    Period(String),

    #[error("unknown model '{0}'")]
    Model(String),
}

/// Parse a timestamp-like string into a UTC [`Timestamp`].
///
/// Accepts RFC 3339 (`2024-05-20T13:00:00Z`), naive date-times with a space
/// or `T` separator and optional seconds (`2024-05-20 13:00`), and bare dates
/// (`2024-05-20`, meaning midnight). Naive inputs are taken as UTC.
///
/// # Examples
///
/// ```
/// use chrono::Timelike;
/// use fmrc_types::time::parse_timestamp;
///
/// let t = parse_timestamp("2024-05-20 13:00").unwrap();
/// assert_eq!(t.hour(), 13);
/// assert!(parse_timestamp("yesterday").is_err());
/// ```
pub fn parse_timestamp(input: &str) -> Result<Timestamp, ParseError> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }

    Err(ParseError::Timestamp(input.to_string()))
}

/// Parse a compact period string such as `"32h"`, `"1d6h"`, `"90m"`,
/// `"45s"`, `"500ms"` or `"0"`. A leading `-` negates the whole value.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use fmrc_types::time::parse_period;
///
/// assert_eq!(parse_period("32h").unwrap(), TimeDelta::hours(32));
/// assert_eq!(parse_period("1d6h").unwrap(), TimeDelta::hours(30));
/// assert!(parse_period("32").is_err());
/// ```
pub fn parse_period(input: &str) -> Result<Period, ParseError> {
    let err = || ParseError::Period(input.to_string());

    let trimmed = input.trim();
    let (negative, mut rest) = match trimmed.strip_prefix('-') {
        Some(stripped) => (true, stripped),
        None => (false, trimmed),
    };

    if rest == "0" {
        return Ok(Period::zero());
    }
    if rest.is_empty() {
        return Err(err());
    }

    let mut total = Period::zero();
    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(err)?;
        if digits_end == 0 {
            return Err(err());
        }
        let amount: i64 = rest[..digits_end].parse().map_err(|_| err())?;

        let tail = &rest[digits_end..];
        let unit_end = tail
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(tail.len());
        let part = match &tail[..unit_end] {
            "d" => TimeDelta::try_days(amount),
            "h" => TimeDelta::try_hours(amount),
            "m" | "min" => TimeDelta::try_minutes(amount),
            "s" => TimeDelta::try_seconds(amount),
            "ms" => TimeDelta::try_milliseconds(amount),
            "us" | "µs" => Some(TimeDelta::microseconds(amount)),
            "ns" => Some(TimeDelta::nanoseconds(amount)),
            _ => None,
        }
        .ok_or_else(err)?;

        total = total.checked_add(&part).ok_or_else(err)?;
        rest = &tail[unit_end..];
    }

    Ok(if negative { -total } else { total })
}

/// Render a period in the compact form accepted by [`parse_period`],
/// using hours as the largest unit (`"32h"`, `"1h30m"`, `"1ms500us"`, `"0"`).
///
/// Exact down to the nanosecond, so the output always parses back to `period`.
pub fn format_period(period: Period) -> String {
    if period.is_zero() {
        return "0".to_string();
    }

    let (sign, magnitude) = if period < Period::zero() {
        ("-", -period)
    } else {
        ("", period)
    };

    let secs = magnitude.num_seconds();
    let nanos = i64::from(magnitude.subsec_nanos());
    let parts = [
        (secs / 3_600, "h"),
        ((secs / 60) % 60, "m"),
        (secs % 60, "s"),
        (nanos / 1_000_000, "ms"),
        ((nanos / 1_000) % 1_000, "us"),
        (nanos % 1_000, "ns"),
    ];

    let mut out = String::from(sign);
    for (amount, unit) in parts {
        if amount != 0 {
            out.push_str(&amount.to_string());
            out.push_str(unit);
        }
    }
    out
}

/// Serde adapter storing a [`Period`] as its compact string form.
pub mod period_serde {
    use super::{Period, format_period, parse_period};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(period: &Period, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_period(*period))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Period, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_period(&raw).map_err(D::Error::custom)
    }
}
