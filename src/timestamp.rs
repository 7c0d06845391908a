use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};

use crate::error::{Error, Result};

/// An RFC3339 instant in UTC with optional fractional seconds.
///
/// The literal text is the value: whatever string was parsed or decoded is
/// carried through the codec byte-for-byte, so a document's timestamps hash
/// the same no matter how many times it round-trips. Validation happens only
/// in [`Timestamp::new`]; the decode path accepts any literal, matching the
/// lossless-preservation rule for temporal scalars.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(String);

impl Timestamp {
    /// Validates `text` as RFC3339 and wraps it, preserving the exact
    /// literal.
    pub fn new(text: impl Into<String>) -> Result<Timestamp> {
        let text = text.into();
        DateTime::parse_from_rfc3339(&text).map_err(|_| Error::InvalidTimestamp {
            kind: "timestamp",
            text: text.clone(),
        })?;
        Ok(Timestamp(text))
    }

    /// Wraps a literal without validation. Used when decoding, where the
    /// wire text must be preserved exactly.
    pub fn from_literal(text: impl Into<String>) -> Timestamp {
        Timestamp(text.into())
    }

    /// The current wall clock in UTC, formatted as RFC3339 with nanosecond
    /// precision.
    pub fn now_utc() -> Timestamp {
        Timestamp(Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true))
    }

    /// The preserved literal.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(t: DateTime<Utc>) -> Self {
        Timestamp(t.to_rfc3339_opts(SecondsFormat::Nanos, true))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// A calendar date as the literal `YYYY-MM-DD`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(String);

impl Date {
    /// Builds a date from components, failing on out-of-range values.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Date> {
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| Error::InvalidTimestamp {
            kind: "date",
            text: format!("{:04}-{:02}-{:02}", year, month, day),
        })?;
        Ok(Date(format!("{:04}-{:02}-{:02}", year, month, day)))
    }

    /// Validates `text` as `YYYY-MM-DD` and wraps it.
    pub fn new(text: impl Into<String>) -> Result<Date> {
        let text = text.into();
        NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|_| Error::InvalidTimestamp {
            kind: "date",
            text: text.clone(),
        })?;
        Ok(Date(text))
    }

    /// Wraps a literal without validation, for the decode path.
    pub fn from_literal(text: impl Into<String>) -> Date {
        Date(text.into())
    }

    /// The preserved literal.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Date {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Date({})", self.0)
    }
}

/// A time of day as the literal `HH:MM:SS`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(String);

impl Time {
    /// Builds a time of day from components, failing on out-of-range
    /// values.
    pub fn from_hms(hour: u32, min: u32, sec: u32) -> Result<Time> {
        NaiveTime::from_hms_opt(hour, min, sec).ok_or_else(|| Error::InvalidTimestamp {
            kind: "time",
            text: format!("{:02}:{:02}:{:02}", hour, min, sec),
        })?;
        Ok(Time(format!("{:02}:{:02}:{:02}", hour, min, sec)))
    }

    /// Validates `text` as `HH:MM:SS` and wraps it.
    pub fn new(text: impl Into<String>) -> Result<Time> {
        let text = text.into();
        NaiveTime::parse_from_str(&text, "%H:%M:%S").map_err(|_| Error::InvalidTimestamp {
            kind: "time",
            text: text.clone(),
        })?;
        Ok(Time(text))
    }

    /// Wraps a literal without validation, for the decode path.
    pub fn from_literal(text: impl Into<String>) -> Time {
        Time(text.into())
    }

    /// The preserved literal.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Time({})", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn now_is_valid_rfc3339_utc() {
        let ts = Timestamp::now_utc();
        let parsed = DateTime::parse_from_rfc3339(ts.as_str()).unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 0);
        assert!(ts.as_str().ends_with('Z'));
    }

    #[test]
    fn new_validates_and_preserves() {
        let ts = Timestamp::new("2025-08-08T07:42:01.344243000Z").unwrap();
        assert_eq!(ts.as_str(), "2025-08-08T07:42:01.344243000Z");
        assert!(Timestamp::new("2025-08-08").is_err());
        assert!(Timestamp::new("yesterday").is_err());
    }

    #[test]
    fn date_bounds() {
        assert_eq!(Date::from_ymd(2025, 2, 28).unwrap().as_str(), "2025-02-28");
        assert!(Date::from_ymd(2025, 2, 30).is_err());
        assert!(Date::new("2025-13-01").is_err());
        assert_eq!(Date::new("2025-12-31").unwrap().as_str(), "2025-12-31");
    }

    #[test]
    fn time_bounds() {
        assert_eq!(Time::from_hms(23, 59, 59).unwrap().as_str(), "23:59:59");
        assert!(Time::from_hms(24, 0, 0).is_err());
        assert!(Time::new("12:60:00").is_err());
    }
}
