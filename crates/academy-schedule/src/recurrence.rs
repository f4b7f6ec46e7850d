//! Recurrence rules for to-dos and calendar events.
//!
//! A rule is one of three closed kinds: a one-off date range (`none`), every
//! seven days from an anchor (`weekly`), or the anchor's day of month
//! (`monthly`). Membership is decided with integer day counts only; see
//! [`crate::date`].
//!
//! Monthly rules anchored on a day that a month lacks (e.g. the 31st) simply
//! have no occurrence in that month. There is no "nearest valid day" fallback.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date::days_between;
use crate::error::{Result, ScheduleError};

/// Longest gap, in months, between two monthly occurrences. An anchor on the
/// 29th misses only February, and at most once per year, so 12 covers it.
const MAX_MONTHLY_GAP: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    None,
    Weekly,
    Monthly,
}

impl RecurrenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecurrenceKind::None => "none",
            RecurrenceKind::Weekly => "weekly",
            RecurrenceKind::Monthly => "monthly",
        }
    }

    pub fn is_recurring(self) -> bool {
        !matches!(self, RecurrenceKind::None)
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceKind {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(RecurrenceKind::None),
            "weekly" => Ok(RecurrenceKind::Weekly),
            "monthly" => Ok(RecurrenceKind::Monthly),
            other => Err(ScheduleError::UnknownRecurrenceKind(other.to_string())),
        }
    }
}

/// When a to-do or event applies.
///
/// Replaced wholesale on edit; there are no field setters, so a kind can never
/// be paired with an anchor that was validated for a different kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleRepr", into = "RuleRepr")]
pub struct RecurrenceRule {
    kind: RecurrenceKind,
    anchor_date: NaiveDate,
    start_date: Option<NaiveDate>,
    due_date: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct RuleRepr {
    kind: String,
    #[serde(with = "crate::date::strict")]
    anchor_date: NaiveDate,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::date::strict::option"
    )]
    start_date: Option<NaiveDate>,
    #[serde(with = "crate::date::strict")]
    due_date: NaiveDate,
}

impl TryFrom<RuleRepr> for RecurrenceRule {
    type Error = ScheduleError;

    fn try_from(r: RuleRepr) -> Result<Self> {
        let kind: RecurrenceKind = r.kind.parse()?;
        if kind.is_recurring() {
            if let Some(start) = r.start_date {
                return Err(ScheduleError::StartDateOnRecurring {
                    kind: r.kind,
                    start,
                });
            }
            return RecurrenceRule::recurring(kind, r.anchor_date, r.due_date);
        }
        let rule = match r.start_date {
            Some(start) => RecurrenceRule::ranged(start, r.due_date)?,
            None => RecurrenceRule::once(r.due_date)?,
        };
        rule.with_anchor(r.anchor_date)
    }
}

impl From<RecurrenceRule> for RuleRepr {
    fn from(r: RecurrenceRule) -> Self {
        RuleRepr {
            kind: r.kind.as_str().to_string(),
            anchor_date: r.anchor_date,
            start_date: r.start_date,
            due_date: r.due_date,
        }
    }
}

impl RecurrenceRule {
    /// A one-off rule applying on `due_date` only.
    pub fn once(due_date: NaiveDate) -> Result<Self> {
        Self::ranged(due_date, due_date)
    }

    /// A one-off rule applying on every day of `[start_date, due_date]`.
    ///
    /// # Errors
    /// Returns `ScheduleError::StartAfterDue` when `start_date > due_date`.
    pub fn ranged(start_date: NaiveDate, due_date: NaiveDate) -> Result<Self> {
        if start_date > due_date {
            return Err(ScheduleError::StartAfterDue {
                start: start_date,
                due: due_date,
            });
        }
        Ok(Self {
            kind: RecurrenceKind::None,
            anchor_date: start_date,
            start_date: Some(start_date),
            due_date,
        })
    }

    /// A weekly or monthly rule measured from `anchor_date`.
    ///
    /// `due_date` is carried for display and sorting only; it does not bound
    /// membership. Passing `RecurrenceKind::None` builds a one-off rule on
    /// `[anchor_date, due_date]`.
    ///
    /// # Errors
    /// Returns `ScheduleError::AnchorAfterDue` when `anchor_date > due_date`.
    pub fn recurring(kind: RecurrenceKind, anchor_date: NaiveDate, due_date: NaiveDate) -> Result<Self> {
        if anchor_date > due_date {
            return Err(ScheduleError::AnchorAfterDue {
                anchor: anchor_date,
                due: due_date,
            });
        }
        if !kind.is_recurring() {
            return Self::ranged(anchor_date, due_date);
        }
        Ok(Self {
            kind,
            anchor_date,
            start_date: None,
            due_date,
        })
    }

    /// Replace the anchor of a one-off rule, keeping its range.
    fn with_anchor(mut self, anchor_date: NaiveDate) -> Result<Self> {
        if anchor_date > self.due_date {
            return Err(ScheduleError::AnchorAfterDue {
                anchor: anchor_date,
                due: self.due_date,
            });
        }
        self.anchor_date = anchor_date;
        Ok(self)
    }

    pub fn kind(&self) -> RecurrenceKind {
        self.kind
    }

    pub fn anchor_date(&self) -> NaiveDate {
        self.anchor_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// First day a one-off rule applies (defaults to the due date).
    pub fn start_date(&self) -> NaiveDate {
        self.start_date.unwrap_or(self.due_date)
    }

    /// Whether the rule has an occurrence on `date`.
    ///
    /// Pure in `(self, date)`: repeated calls for the same inputs always agree.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        match self.kind {
            RecurrenceKind::None => date >= self.start_date() && date <= self.due_date,
            RecurrenceKind::Weekly => {
                date >= self.anchor_date && days_between(self.anchor_date, date) % 7 == 0
            }
            RecurrenceKind::Monthly => date >= self.anchor_date && date.day() == self.anchor_date.day(),
        }
    }

    /// All occurrence dates within the inclusive window `[from, to]`.
    ///
    /// Used to build a calendar's "has occurrence" marks for a visible range.
    pub fn occurrences_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut cursor = self.next_occurrence(from);
        while let Some(date) = cursor {
            if date > to {
                break;
            }
            dates.push(date);
            cursor = date.succ_opt().and_then(|next| self.next_occurrence(next));
        }
        dates
    }

    /// The earliest occurrence on or after `date`, if any.
    pub fn next_occurrence(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self.kind {
            RecurrenceKind::None => {
                let candidate = date.max(self.start_date());
                (candidate <= self.due_date).then_some(candidate)
            }
            RecurrenceKind::Weekly => {
                if date <= self.anchor_date {
                    return Some(self.anchor_date);
                }
                let offset = days_between(self.anchor_date, date).rem_euclid(7);
                let ahead = if offset == 0 { 0 } else { 7 - offset };
                date.checked_add_days(Days::new(ahead as u64))
            }
            RecurrenceKind::Monthly => {
                let from = date.max(self.anchor_date);
                let day = self.anchor_date.day();
                let first_of_month = from.with_day(1)?;
                (0..=MAX_MONTHLY_GAP)
                    .filter_map(|k| first_of_month.checked_add_months(Months::new(k)))
                    .filter_map(|month| month.with_day(day))
                    .find(|candidate| *candidate >= from)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_date;

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert_eq!(
            "daily".parse::<RecurrenceKind>().unwrap_err(),
            ScheduleError::UnknownRecurrenceKind("daily".into())
        );
    }

    #[test]
    fn once_defaults_start_to_due() {
        let rule = RecurrenceRule::once(d("2026-01-10")).unwrap();
        assert_eq!(rule.start_date(), d("2026-01-10"));
        assert!(rule.applies_on(d("2026-01-10")));
        assert!(!rule.applies_on(d("2026-01-09")));
    }

    #[test]
    fn weekly_next_occurrence_rounds_up() {
        let rule =
            RecurrenceRule::recurring(RecurrenceKind::Weekly, d("2026-01-05"), d("2026-01-05")).unwrap();
        assert_eq!(rule.next_occurrence(d("2025-12-01")), Some(d("2026-01-05")));
        assert_eq!(rule.next_occurrence(d("2026-01-06")), Some(d("2026-01-12")));
        assert_eq!(rule.next_occurrence(d("2026-01-12")), Some(d("2026-01-12")));
    }

    #[test]
    fn monthly_next_occurrence_skips_short_months() {
        let rule =
            RecurrenceRule::recurring(RecurrenceKind::Monthly, d("2026-01-31"), d("2026-01-31")).unwrap();
        assert_eq!(rule.next_occurrence(d("2026-02-01")), Some(d("2026-03-31")));
    }
}
