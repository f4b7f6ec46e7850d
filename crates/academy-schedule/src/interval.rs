//! Time-of-day intervals and the weekday tag.
//!
//! A [`TimeInterval`] is a half-open `[start, end)` range of minutes since
//! midnight. Touching intervals (one ends exactly when the other starts) do
//! NOT overlap, so back-to-back classes are allowed.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Minutes in a civil day. Interval bounds must be strictly below this.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Day of the week. Wire form is the lowercase three-letter tag (`"mon"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
            Weekday::Sun => "sun",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Weekday::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ScheduleError::UnknownWeekday(s.to_string()))
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(d: chrono::Weekday) -> Self {
        match d {
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
            chrono::Weekday::Sun => Weekday::Sun,
        }
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(d: Weekday) -> Self {
        match d {
            Weekday::Mon => chrono::Weekday::Mon,
            Weekday::Tue => chrono::Weekday::Tue,
            Weekday::Wed => chrono::Weekday::Wed,
            Weekday::Thu => chrono::Weekday::Thu,
            Weekday::Fri => chrono::Weekday::Fri,
            Weekday::Sat => chrono::Weekday::Sat,
            Weekday::Sun => chrono::Weekday::Sun,
        }
    }
}

/// A half-open time-of-day range in minutes since midnight.
///
/// Serialized as `{"start": "HH:MM", "end": "HH:MM"}`; deserialization runs
/// the same validation as [`TimeInterval::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalRepr", into = "IntervalRepr")]
pub struct TimeInterval {
    start_minutes: u16,
    end_minutes: u16,
}

#[derive(Serialize, Deserialize)]
struct IntervalRepr {
    start: String,
    end: String,
}

impl TryFrom<IntervalRepr> for TimeInterval {
    type Error = ScheduleError;

    fn try_from(r: IntervalRepr) -> Result<Self> {
        TimeInterval::parse(&r.start, &r.end)
    }
}

impl From<TimeInterval> for IntervalRepr {
    fn from(i: TimeInterval) -> Self {
        IntervalRepr {
            start: format_hhmm(i.start_minutes),
            end: format_hhmm(i.end_minutes),
        }
    }
}

impl TimeInterval {
    /// Build an interval from minute offsets.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidInterval` unless `start < end < 1440`.
    pub fn new(start_minutes: u16, end_minutes: u16) -> Result<Self> {
        if start_minutes >= end_minutes || end_minutes >= MINUTES_PER_DAY {
            return Err(ScheduleError::InvalidInterval {
                start: start_minutes,
                end: end_minutes,
            });
        }
        Ok(Self {
            start_minutes,
            end_minutes,
        })
    }

    /// Build an interval from two `HH:MM` wall-clock strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_hhmm(start)?, parse_hhmm(end)?)
    }

    pub fn start_minutes(&self) -> u16 {
        self.start_minutes
    }

    pub fn end_minutes(&self) -> u16 {
        self.end_minutes
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end_minutes - self.start_minutes
    }

    /// True iff the two half-open ranges share at least one minute.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        overlaps(self, other)
    }

    /// Length of the shared range in minutes (0 when disjoint or touching).
    pub fn overlap_minutes(&self, other: &TimeInterval) -> u16 {
        let start = self.start_minutes.max(other.start_minutes);
        let end = self.end_minutes.min(other.end_minutes);
        end.saturating_sub(start)
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            format_hhmm(self.start_minutes),
            format_hhmm(self.end_minutes)
        )
    }
}

/// Two intervals overlap when `a.start < b.end && b.start < a.end`.
///
/// This excludes the adjacent case where `a.end == b.start`.
pub fn overlaps(a: &TimeInterval, b: &TimeInterval) -> bool {
    a.start_minutes < b.end_minutes && b.start_minutes < a.end_minutes
}

/// Parse a strict 24-hour `HH:MM` string into minutes since midnight.
///
/// Two digits, a colon, two digits; no padding or signs.
pub fn parse_hhmm(s: &str) -> Result<u16> {
    let shaped = s.len() == 5
        && s.bytes().enumerate().all(|(i, b)| match i {
            2 => b == b':',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(ScheduleError::InvalidTime(s.to_string()));
    }
    let time = NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| ScheduleError::InvalidTime(s.to_string()))?;
    // Bounded by 23*60+59, fits in u16.
    Ok((time.hour() * 60 + time.minute()) as u16)
}

/// Format minutes since midnight as `HH:MM`.
pub fn format_hhmm(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hhmm_roundtrip() {
        assert_eq!(parse_hhmm("00:00").unwrap(), 0);
        assert_eq!(parse_hhmm("14:30").unwrap(), 870);
        assert_eq!(parse_hhmm("23:59").unwrap(), 1439);
        assert_eq!(format_hhmm(870), "14:30");
        assert!(parse_hhmm("24:00").is_err());
        assert!(parse_hhmm("9:00").is_err());
        assert!(parse_hhmm("09:60").is_err());
        assert!(parse_hhmm("0900").is_err());
        assert!(parse_hhmm(" 9:00").is_err());
        assert!(parse_hhmm("09: 0").is_err());
        assert!(parse_hhmm("+9:00").is_err());
        assert!(parse_hhmm("09.00").is_err());
    }

    #[test]
    fn weekday_tags() {
        assert_eq!("wed".parse::<Weekday>().unwrap(), Weekday::Wed);
        assert!("Wed".parse::<Weekday>().is_err());
        assert!("wednesday".parse::<Weekday>().is_err());
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sun);
    }
}
