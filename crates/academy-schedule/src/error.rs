//! Error types for academy-schedule operations.

use chrono::NaiveDate;
use thiserror::Error;

use crate::interval::Weekday;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid time of day: '{0}' (expected HH:MM)")]
    InvalidTime(String),

    #[error("Invalid interval: start {start} must be before end {end} (minutes since midnight, < 1440)")]
    InvalidInterval { start: u16, end: u16 },

    #[error("Invalid date: '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Unknown weekday: '{0}'")]
    UnknownWeekday(String),

    #[error("Schedule '{0}' has no weekdays")]
    NoWeekdays(String),

    #[error("Override for {weekday} on schedule '{schedule}' is outside its weekdays")]
    OverrideOutsideWeekdays { schedule: String, weekday: Weekday },

    #[error("Unknown recurrence kind: '{0}'")]
    UnknownRecurrenceKind(String),

    #[error("start_date {start} is only allowed on one-off rules, not '{kind}'")]
    StartDateOnRecurring { kind: String, start: NaiveDate },

    #[error("Anchor date {anchor} is after due date {due}")]
    AnchorAfterDue { anchor: NaiveDate, due: NaiveDate },

    #[error("Start date {start} is after due date {due}")]
    StartAfterDue { start: NaiveDate, due: NaiveDate },

    #[error("Range event '{id}' ends ({end}) before it starts ({start})")]
    InvalidRange {
        id: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Week row must be 7 consecutive dates: {0}")]
    InvalidWeek(String),

    #[error("Invalid month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
