//! Time types for calendar events.
//!
//! Reservation data mixes precise datetimes with date-only values (an
//! overnight stay, a flight where only the departure day is known).
//! [`EventTime`] keeps both representable so the conflict-window arithmetic
//! can distinguish all-day events from point events.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Errors from parsing time and duration strings.
#[derive(Debug, Error)]
pub enum TimeParseError {
    /// The value is neither an ISO-8601 datetime nor a date.
    #[error("unrecognized date/time value: {0}")]
    Unrecognized(String),
    /// The timezone name is not a known IANA identifier.
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
    /// A duration string is not in `HH:MM:SS` form.
    #[error("invalid duration (expected HH:MM:SS): {0}")]
    InvalidDuration(String),
}

/// The start or end of a calendar event.
///
/// Either a specific instant (stored in UTC) or an all-day date with no
/// time-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum EventTime {
    /// A specific datetime, stored in UTC.
    DateTime(DateTime<Utc>),
    /// An all-day event date (no specific time).
    AllDay(NaiveDate),
}

impl EventTime {
    /// Creates an `EventTime::DateTime` from a UTC datetime.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }

    /// Creates an `EventTime::AllDay` from a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::AllDay(date)
    }

    /// Parses an ISO-8601 value as produced by the extractor.
    ///
    /// Values carrying an offset are converted to UTC. Naive datetimes are
    /// interpreted in `tz` when an IANA name is given, otherwise assumed
    /// UTC. Date-only values become all-day times.
    pub fn parse(value: &str, tz: Option<&str>) -> Result<Self, TimeParseError> {
        let value = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self::DateTime(dt.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
            return match tz {
                Some(name) => {
                    let zone: chrono_tz::Tz = name
                        .parse()
                        .map_err(|_| TimeParseError::UnknownTimezone(name.to_string()))?;
                    zone.from_local_datetime(&naive)
                        .earliest()
                        .map(|dt| Self::DateTime(dt.with_timezone(&Utc)))
                        .ok_or_else(|| TimeParseError::Unrecognized(value.to_string()))
                }
                None => Ok(Self::DateTime(Utc.from_utc_datetime(&naive))),
            };
        }
        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return Ok(Self::AllDay(date));
        }
        Err(TimeParseError::Unrecognized(value.to_string()))
    }

    /// Returns `true` if this is an all-day event time.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }

    /// Returns the datetime if this is a `DateTime` variant.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(dt),
            Self::AllDay(_) => None,
        }
    }

    /// Returns the date if this is an `AllDay` variant.
    pub fn as_date(&self) -> Option<&NaiveDate> {
        match self {
            Self::AllDay(d) => Some(d),
            Self::DateTime(_) => None,
        }
    }

    /// Converts to a UTC datetime for comparison purposes.
    ///
    /// All-day events compare at midnight UTC on their date.
    pub fn to_utc_datetime(&self) -> DateTime<Utc> {
        match self {
            Self::DateTime(dt) => *dt,
            Self::AllDay(date) => date.and_hms_opt(0, 0, 0).expect("valid time").and_utc(),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S UTC")),
            Self::AllDay(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl PartialOrd for EventTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_utc_datetime().cmp(&other.to_utc_datetime())
    }
}

/// Parses a duration string in the form `HH:MM:SS`.
pub fn parse_hms_duration(value: &str) -> Result<Duration, TimeParseError> {
    let invalid = || TimeParseError::InvalidDuration(value.to_string());
    let parts: Vec<&str> = value.trim().split(':').collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return Err(invalid());
    };
    let hours: i64 = hours.parse().map_err(|_| invalid())?;
    let minutes: i64 = minutes.parse().map_err(|_| invalid())?;
    let seconds: i64 = seconds.parse().map_err(|_| invalid())?;
    Ok(Duration::hours(hours) + Duration::minutes(minutes) + Duration::seconds(seconds))
}

/// Formats a duration as an iCalendar DURATION value (e.g. `PT2H30M0S`).
pub fn format_ical_duration(duration: Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!(
        "{}PT{}H{}M{}S",
        sign,
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
