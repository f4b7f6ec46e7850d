//! Month grid rows: runs of 7 consecutive dates.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date::{days_between, days_in_month, parse_date};
use crate::error::{Result, ScheduleError};

/// First column of a calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Column index of `date`'s weekday in a row starting on this day.
    fn column_of_weekday(self, date: NaiveDate) -> u32 {
        match self {
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            WeekStart::Monday => date.weekday().num_days_from_monday(),
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeekStart::Sunday => "sunday",
            WeekStart::Monday => "monday",
        })
    }
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            other => Err(format!("unknown week start '{}' (expected sunday or monday)", other)),
        }
    }
}

/// Seven consecutive dates rendered as one calendar row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WeekRowRepr")]
pub struct WeekRow {
    dates: [NaiveDate; 7],
}

#[derive(Deserialize)]
struct WeekRowRepr {
    dates: [String; 7],
}

impl TryFrom<WeekRowRepr> for WeekRow {
    type Error = ScheduleError;

    fn try_from(r: WeekRowRepr) -> Result<Self> {
        let mut dates = [NaiveDate::MIN; 7];
        for (slot, raw) in dates.iter_mut().zip(&r.dates) {
            *slot = parse_date(raw)?;
        }
        Self::from_dates(dates)
    }
}

impl WeekRow {
    /// The row beginning on `first`.
    ///
    /// Returns `None` only at the edge of chrono's representable range.
    pub fn starting(first: NaiveDate) -> Option<Self> {
        let mut dates = [first; 7];
        for (i, slot) in dates.iter_mut().enumerate().skip(1) {
            *slot = first.checked_add_days(Days::new(i as u64))?;
        }
        Some(Self { dates })
    }

    /// The row of `week_start`-first week that contains `date`.
    pub fn containing(date: NaiveDate, week_start: WeekStart) -> Option<Self> {
        let back = week_start.column_of_weekday(date);
        Self::starting(date.checked_sub_days(Days::new(u64::from(back)))?)
    }

    /// Validate caller-supplied dates.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidWeek` unless each date is the day after
    /// the previous one.
    pub fn from_dates(dates: [NaiveDate; 7]) -> Result<Self> {
        if let Some(pair) = dates.windows(2).find(|w| days_between(w[0], w[1]) != 1) {
            return Err(ScheduleError::InvalidWeek(format!(
                "{} is not followed by {}",
                pair[0], pair[1]
            )));
        }
        Ok(Self { dates })
    }

    pub fn dates(&self) -> &[NaiveDate; 7] {
        &self.dates
    }

    pub fn first(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last(&self) -> NaiveDate {
        self.dates[6]
    }

    /// Column of `date` within the row.
    pub fn column_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = days_between(self.first(), date);
        (0..7).contains(&offset).then_some(offset as usize)
    }
}

/// The rows covering a month, first row starting on or before the 1st and
/// last row ending on or after the month's last day.
///
/// # Errors
/// Returns `ScheduleError::InvalidMonth` for a month outside 1..=12 or a year
/// chrono cannot represent.
pub fn month_grid(year: i32, month: u32, week_start: WeekStart) -> Result<Vec<WeekRow>> {
    let invalid = || ScheduleError::InvalidMonth { year, month };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let last = days_in_month(year, month)
        .and_then(|n| NaiveDate::from_ymd_opt(year, month, n))
        .ok_or_else(invalid)?;

    let mut rows = Vec::with_capacity(6);
    let mut row = WeekRow::containing(first, week_start).ok_or_else(invalid)?;
    loop {
        rows.push(row);
        if row.last() >= last {
            break;
        }
        row = row
            .last()
            .succ_opt()
            .and_then(WeekRow::starting)
            .ok_or_else(invalid)?;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn february_2026_sunday_first() {
        // 2026-02-01 is a Sunday and the month has exactly four weeks.
        let rows = month_grid(2026, 2, WeekStart::Sunday).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].first(), parse_date("2026-02-01").unwrap());
        assert_eq!(rows[3].last(), parse_date("2026-02-28").unwrap());
    }

    #[test]
    fn monday_first_pads_leading_days() {
        let rows = month_grid(2026, 2, WeekStart::Monday).unwrap();
        assert_eq!(rows[0].first(), parse_date("2026-01-26").unwrap());
        assert_eq!(rows.last().unwrap().last(), parse_date("2026-03-01").unwrap());
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn rejects_bad_month() {
        assert!(month_grid(2026, 0, WeekStart::Sunday).is_err());
        assert!(month_grid(2026, 13, WeekStart::Sunday).is_err());
    }

    #[test]
    fn non_consecutive_week_rejected() {
        let base = parse_date("2026-01-04").unwrap();
        let mut dates = *WeekRow::starting(base).unwrap().dates();
        dates[3] = dates[4];
        assert!(WeekRow::from_dates(dates).is_err());
    }

    #[test]
    fn json_rows_must_be_consecutive() {
        let row = WeekRow::starting(parse_date("2026-01-04").unwrap()).unwrap();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(serde_json::from_str::<WeekRow>(&json).unwrap(), row);

        let gap = r#"{"dates":["2026-01-01","2026-03-01","2026-03-02","2026-03-03","2026-03-04","2026-03-05","2026-03-06"]}"#;
        let err = serde_json::from_str::<WeekRow>(gap).unwrap_err();
        assert!(err.to_string().contains("7 consecutive dates"), "got: {}", err);

        let padded = r#"{"dates":["2026-01- 4","2026-01-05","2026-01-06","2026-01-07","2026-01-08","2026-01-09","2026-01-10"]}"#;
        assert!(serde_json::from_str::<WeekRow>(padded).is_err());
    }
}
