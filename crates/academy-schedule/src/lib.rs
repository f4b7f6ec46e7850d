//! # academy-schedule
//!
//! Scheduling and recurrence engine for an academy portal.
//!
//! The engine answers three questions that are easy to get silently wrong in
//! an admin UI: does this class clash with the teacher's or student's other
//! classes, does this to-do apply on a given date (and is it done or overdue),
//! and how does a multi-day event draw across the rows of a month calendar.
//! Every operation is a pure function of the data passed in; storage is a
//! collaborator behind the traits in [`ports`].
//!
//! ## Modules
//!
//! - [`interval`] — `HH:MM` time-of-day ranges, overlap test, weekday tag
//! - [`schedule`] — weekly time blocks with per-weekday overrides
//! - [`conflict`] — candidate schedule vs. an actor's existing schedules
//! - [`recurrence`] — none / weekly / monthly rules and date membership
//! - [`occurrence`] — completion ledger, overdue check, toggle
//! - [`layout`] — clipping range events into week-row bars
//! - [`grid`] — month grids of 7-date rows
//! - [`date`] — strict `YYYY-MM-DD` parsing and day-count arithmetic
//! - [`ports`] — storage traits, in-memory store, fetch-evaluate flows
//! - [`error`] — Error types

pub mod conflict;
pub mod date;
pub mod error;
pub mod grid;
pub mod interval;
pub mod layout;
pub mod occurrence;
pub mod ports;
pub mod recurrence;
pub mod schedule;

pub use conflict::{check, find_all, BookingConflict};
pub use date::{format_date, parse_date};
pub use error::ScheduleError;
pub use grid::{month_grid, WeekRow, WeekStart};
pub use interval::{overlaps, TimeInterval, Weekday};
pub use layout::{layout_month, layout_week, RangeEvent, WeekSegment};
pub use occurrence::{toggle, CompletionRecord, OccurrenceStatus, OccurrenceTracker};
pub use recurrence::{RecurrenceKind, RecurrenceRule};
pub use schedule::WeeklySchedule;
