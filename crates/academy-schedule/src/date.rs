//! Civil-date helpers.
//!
//! Dates cross the engine boundary as `YYYY-MM-DD` strings and are held as
//! `chrono::NaiveDate`, which carries no time of day and no offset. All
//! comparisons reduce to integer day counts, so there is no local-time
//! conversion anywhere that could shift a date by one.

use chrono::{Datelike, NaiveDate};

use crate::error::{Result, ScheduleError};

/// Parse a strict `YYYY-MM-DD` date.
///
/// The byte shape is checked before chrono sees the string: dashes at
/// positions 4 and 7, ASCII digits everywhere else. `2026-1-5`,
/// `2026-01- 5`, `+026-01-05` and `2026-01-05T00:00:00` all fail instead of
/// being coerced.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let shaped = s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(ScheduleError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ScheduleError::InvalidDate(s.to_string()))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Days since 0001-01-01 (proleptic Gregorian), day 1 being that date.
pub fn day_count(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    day_count(to) - day_count(from)
}

/// Number of days in the given month, or `None` for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(days_between(first, next)).ok()
}

/// Serde adapter enforcing [`parse_date`] on the wire.
///
/// chrono's own `NaiveDate` deserializer accepts variants such as a leading
/// `+` or extra padding; boundary types use this instead.
pub mod strict {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_date(&s).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => serializer.serialize_str(&crate::date::format_date(*d)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|s| crate::date::parse_date(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
