//! Upload date wrapper and timestamp parsing shared by backends.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while parsing an upload date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    /// The input string was empty.
    #[error("Empty timestamp string")]
    EmptyString,

    /// The input did not match any supported format.
    #[error("Invalid timestamp: {0}")]
    InvalidFormat(String),

    /// Nanosecond precision is not supported.
    #[error("Nanosecond precision timestamps are not supported")]
    NanosecondPrecision,
}

/// A parsed upload date.
///
/// Backends that only know a relative date ("3 weeks ago") still produce a
/// concrete instant and mark it as an approximation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDate {
    /// The instant of upload.
    pub date: DateTime<Utc>,
    /// Whether the instant was derived from an imprecise source.
    #[serde(default)]
    pub approximation: bool,
}

impl UploadDate {
    /// Creates an exact upload date.
    #[must_use]
    pub fn exact(date: DateTime<Utc>) -> Self {
        Self {
            date,
            approximation: false,
        }
    }

    /// Creates an approximate upload date.
    #[must_use]
    pub fn approximate(date: DateTime<Utc>) -> Self {
        Self {
            date,
            approximation: true,
        }
    }

    /// Parses an exact upload date from a unix timestamp, ISO 8601,
    /// RFC 2822 or plain `YYYY-MM-DD` string.
    pub fn parse(input: &str) -> Result<Self, DateParseError> {
        parse_timestamp(input).map(Self::exact)
    }

    /// Returns true if the date is strictly before `now`.
    #[must_use]
    pub fn is_before(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }
}

fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, DateParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateParseError::EmptyString);
    }

    if let Ok(num) = trimmed.parse::<i64>() {
        return parse_unix(num);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(DateParseError::InvalidFormat(trimmed.to_string()))
}

/// Unix precision is detected by digit count: up to 10 digits are seconds,
/// up to 13 milliseconds, up to 16 microseconds.
fn parse_unix(value: i64) -> Result<DateTime<Utc>, DateParseError> {
    let digits = value.unsigned_abs().to_string().len();
    let invalid = || DateParseError::InvalidFormat(value.to_string());

    match digits {
        0..=10 => Utc.timestamp_opt(value, 0).single().ok_or_else(invalid),
        11..=13 => Utc.timestamp_millis_opt(value).single().ok_or_else(invalid),
        14..=16 => value
            .checked_mul(1000)
            .map(|nanos| Utc.timestamp_nanos(nanos))
            .ok_or_else(invalid),
        _ => Err(DateParseError::NanosecondPrecision),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_unix_precisions() {
        let secs = UploadDate::parse("1700000000").unwrap();
        let millis = UploadDate::parse("1700000000000").unwrap();
        let micros = UploadDate::parse("1700000000000000").unwrap();

        assert_eq!(secs.date, millis.date);
        assert_eq!(secs.date, micros.date);
        assert!(!secs.approximation);
    }

    #[test]
    fn test_parse_nanoseconds_rejected() {
        assert_eq!(
            UploadDate::parse("1700000000000000000"),
            Err(DateParseError::NanosecondPrecision)
        );
    }

    #[test]
    fn test_parse_iso_and_rfc2822() {
        let iso = UploadDate::parse("2019-05-27T10:00:00Z").unwrap();
        let rfc = UploadDate::parse("Mon, 27 May 2019 10:00:00 +0000").unwrap();
        assert_eq!(iso.date, rfc.date);
        assert_eq!(iso.date.year(), 2019);
    }

    #[test]
    fn test_parse_zone_designator_only_when_trailing() {
        let utc = UploadDate::parse("2019-05-27T10:00:00Z").unwrap();
        let offset = UploadDate::parse("2019-05-27T12:00:00+02:00").unwrap();
        assert_eq!(utc.date, offset.date);
        assert_eq!(utc.date.hour(), 10);

        assert!(matches!(
            UploadDate::parse("2019-05-Z27T10:00:00Z"),
            Err(DateParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_plain_date() {
        let date = UploadDate::parse("2018-05-27").unwrap();
        assert_eq!(date.date.month(), 5);
        assert_eq!(date.date.day(), 27);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(UploadDate::parse("   "), Err(DateParseError::EmptyString));
        assert!(matches!(
            UploadDate::parse("3 weeks ago"),
            Err(DateParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_is_before() {
        let now = Utc::now();
        let past = UploadDate::approximate(now - chrono::Duration::days(3));
        assert!(past.is_before(now));
        assert!(past.approximation);
        assert!(!UploadDate::exact(now).is_before(now));
    }
}
