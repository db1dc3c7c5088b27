//! Service-day times in decimal hours.
//!
//! Timetables give times as `HH:MM:SS` strings where the hour may run past
//! 24 for trips that continue after midnight. Internally every time is a
//! number of hours since the start of the service day, so `25:30:00` is
//! `25.5` and sorts after `23:00:00` on the same service day.

use std::fmt;

use chrono::Duration;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A non-negative, finite number of hours since the start of a service day.
///
/// # Examples
///
/// ```
/// use transit_graph::domain::DecimalHours;
///
/// let t = DecimalHours::parse_hms("08:15:00").unwrap();
/// assert_eq!(t.hours(), 8.25);
///
/// // Trips past midnight stay on the same service day
/// let late = DecimalHours::parse_hms("25:30:00").unwrap();
/// assert_eq!(late.hours(), 25.5);
/// assert_eq!(late.to_string(), "25:30:00");
/// ```
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct DecimalHours(f64);

impl DecimalHours {
    /// Wrap a raw hour count, rejecting negative or non-finite values.
    pub fn new(hours: f64) -> Result<Self, TimeError> {
        if !hours.is_finite() {
            return Err(TimeError::new("hours must be finite"));
        }
        if hours < 0.0 {
            return Err(TimeError::new("hours must not be negative"));
        }
        Ok(Self(hours))
    }

    /// Parse `H:MM:SS` (one or more hour digits) into decimal hours.
    ///
    /// The value is `H + M/60 + S/3600`. Surrounding whitespace is ignored.
    ///
    /// ```
    /// use transit_graph::domain::DecimalHours;
    ///
    /// assert!(DecimalHours::parse_hms("7:05:30").is_ok());
    /// assert!(DecimalHours::parse_hms(" 08:00:00 ").is_ok());
    ///
    /// assert!(DecimalHours::parse_hms("08:00").is_err());
    /// assert!(DecimalHours::parse_hms("08:60:00").is_err());
    /// assert!(DecimalHours::parse_hms("8h00m00").is_err());
    /// ```
    pub fn parse_hms(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.trim().split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TimeError::new("expected H:MM:SS format"));
        };

        let hours = parse_digits(h, 1..=3).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        let minutes =
            parse_digits(m, 2..=2).ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minutes > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        let seconds =
            parse_digits(sec, 2..=2).ok_or_else(|| TimeError::new("invalid second digits"))?;
        if seconds > 59 {
            return Err(TimeError::new("second must be 0-59"));
        }

        Ok(Self(
            f64::from(hours) + f64::from(minutes) / 60.0 + f64::from(seconds) / 3600.0,
        ))
    }

    /// Returns the raw hour count.
    pub fn hours(self) -> f64 {
        self.0
    }

    /// Convert to a `chrono::Duration`, rounded to the millisecond.
    pub fn to_duration(self) -> Duration {
        Duration::milliseconds((self.0 * MILLIS_PER_HOUR).round() as i64)
    }

    /// Build from a `chrono::Duration`. Negative durations are rejected.
    pub fn from_duration(duration: Duration) -> Result<Self, TimeError> {
        Self::new(duration.num_milliseconds() as f64 / MILLIS_PER_HOUR)
    }
}

fn parse_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !len.contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl From<DecimalHours> for f64 {
    fn from(t: DecimalHours) -> f64 {
        t.0
    }
}

impl fmt::Debug for DecimalHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecimalHours({} = {})", self.0, self)
    }
}

/// Formats as `HH:MM:SS`, rounded to the nearest second.
impl fmt::Display for DecimalHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = (self.0 * 3600.0).round() as u64;
        write!(
            f,
            "{:02}:{:02}:{:02}",
            total / 3600,
            (total % 3600) / 60,
            total % 60
        )
    }
}
