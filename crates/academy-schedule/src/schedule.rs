//! Weekly recurring time blocks for a class or booking.
//!
//! A schedule is a default time range applied to a set of weekdays, with an
//! optional per-weekday override of that range. Schedules are immutable:
//! editing a class builds a new schedule, so a stale conflict decision can
//! never be reused against changed times.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::interval::{TimeInterval, Weekday};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleRepr", into = "ScheduleRepr")]
pub struct WeeklySchedule {
    id: String,
    weekdays: BTreeSet<Weekday>,
    default_interval: TimeInterval,
    overrides: BTreeMap<Weekday, TimeInterval>,
}

#[derive(Serialize, Deserialize)]
struct ScheduleRepr {
    id: String,
    weekdays: BTreeSet<Weekday>,
    #[serde(rename = "default")]
    default_interval: TimeInterval,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    overrides: BTreeMap<Weekday, TimeInterval>,
}

impl TryFrom<ScheduleRepr> for WeeklySchedule {
    type Error = ScheduleError;

    fn try_from(r: ScheduleRepr) -> Result<Self> {
        r.overrides.into_iter().try_fold(
            WeeklySchedule::new(r.id, r.weekdays, r.default_interval)?,
            |schedule, (day, interval)| schedule.with_override(day, interval),
        )
    }
}

impl From<WeeklySchedule> for ScheduleRepr {
    fn from(s: WeeklySchedule) -> Self {
        ScheduleRepr {
            id: s.id,
            weekdays: s.weekdays,
            default_interval: s.default_interval,
            overrides: s.overrides,
        }
    }
}

impl WeeklySchedule {
    /// Build a schedule occupying `default_interval` on every day in `weekdays`.
    ///
    /// `id` names the owning class or booking and is what a conflict reports.
    ///
    /// # Errors
    /// Returns `ScheduleError::NoWeekdays` when `weekdays` is empty; such a
    /// schedule would never conflict with anything and is not a valid booking.
    pub fn new(
        id: impl Into<String>,
        weekdays: impl IntoIterator<Item = Weekday>,
        default_interval: TimeInterval,
    ) -> Result<Self> {
        let id = id.into();
        let weekdays: BTreeSet<Weekday> = weekdays.into_iter().collect();
        if weekdays.is_empty() {
            return Err(ScheduleError::NoWeekdays(id));
        }
        Ok(Self {
            id,
            weekdays,
            default_interval,
            overrides: BTreeMap::new(),
        })
    }

    /// Return a new schedule with `weekday` using `interval` instead of the default.
    ///
    /// # Errors
    /// Returns `ScheduleError::OverrideOutsideWeekdays` if `weekday` is not
    /// one of the schedule's days.
    pub fn with_override(mut self, weekday: Weekday, interval: TimeInterval) -> Result<Self> {
        if !self.weekdays.contains(&weekday) {
            return Err(ScheduleError::OverrideOutsideWeekdays {
                schedule: self.id,
                weekday,
            });
        }
        self.overrides.insert(weekday, interval);
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn weekdays(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.weekdays.iter().copied()
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.weekdays.contains(&weekday)
    }

    pub fn default_interval(&self) -> TimeInterval {
        self.default_interval
    }

    pub fn overrides(&self) -> &BTreeMap<Weekday, TimeInterval> {
        &self.overrides
    }

    /// The interval in effect on `weekday`: the override if one exists, else
    /// the default. `None` when the schedule does not meet on that day.
    pub fn effective_interval(&self, weekday: Weekday) -> Option<TimeInterval> {
        if !self.contains(weekday) {
            return None;
        }
        Some(
            self.overrides
                .get(&weekday)
                .copied()
                .unwrap_or(self.default_interval),
        )
    }

    /// Every `(weekday, effective interval)` pair, Monday first.
    pub fn blocks(&self) -> impl Iterator<Item = (Weekday, TimeInterval)> + '_ {
        self.weekdays().filter_map(|d| self.effective_interval(d).map(|i| (d, i)))
    }
}
