//! Per-occurrence completion tracking.
//!
//! A [`CompletionRecord`] says "this assignee completed the occurrence on this
//! date". Records are only ever appended or removed, never edited, and
//! [`toggle`] is the single way to change them, so undo is always a second
//! toggle.
//!
//! The tracker does not know who is assigned to a to-do. Restricting which
//! assignee ids may be toggled is the caller's job.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::recurrence::{RecurrenceKind, RecurrenceRule};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionRecord {
    #[serde(with = "crate::date::strict")]
    pub occurrence_date: NaiveDate,
    pub assignee_id: String,
}

impl CompletionRecord {
    pub fn new(occurrence_date: NaiveDate, assignee_id: impl Into<String>) -> Self {
        Self {
            occurrence_date,
            assignee_id: assignee_id.into(),
        }
    }

    fn matches(&self, date: NaiveDate, assignee_id: &str) -> bool {
        self.occurrence_date == date && self.assignee_id == assignee_id
    }
}

/// State of one occurrence for one assignee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceStatus {
    /// The rule has no occurrence on that date.
    NotScheduled,
    Pending,
    Done,
    /// A one-off rule whose due date has passed without completion.
    Overdue,
}

/// Read-only view pairing a rule with its completion ledger.
#[derive(Debug, Clone, Copy)]
pub struct OccurrenceTracker<'a> {
    rule: &'a RecurrenceRule,
    records: &'a [CompletionRecord],
}

impl<'a> OccurrenceTracker<'a> {
    pub fn new(rule: &'a RecurrenceRule, records: &'a [CompletionRecord]) -> Self {
        Self { rule, records }
    }

    pub fn rule(&self) -> &'a RecurrenceRule {
        self.rule
    }

    /// True iff `assignee_id` has a record for the occurrence on `date`.
    pub fn is_completed(&self, date: NaiveDate, assignee_id: &str) -> bool {
        self.records.iter().any(|r| r.matches(date, assignee_id))
    }

    /// Aggregate view: true iff any assignee completed the occurrence on `date`.
    pub fn is_completed_by_anyone(&self, date: NaiveDate) -> bool {
        is_completed_by_anyone(self.records, date)
    }

    /// Assignees with a record for `date`, in ledger order.
    pub fn completed_assignees(&self, date: NaiveDate) -> Vec<&'a str> {
        self.records
            .iter()
            .filter(|r| r.occurrence_date == date)
            .map(|r| r.assignee_id.as_str())
            .collect()
    }

    /// Whether a one-off rule is past due for `assignee_id` as of `reference`.
    ///
    /// Recurring rules are never overdue; only their current occurrence is
    /// tracked.
    pub fn is_overdue(&self, reference: NaiveDate, assignee_id: &str) -> bool {
        if self.rule.kind() != RecurrenceKind::None {
            return false;
        }
        let due = self.rule.due_date();
        due < reference && !self.is_completed(due, assignee_id)
    }

    /// Status of the occurrence on `date` for `assignee_id`, judged as of
    /// `reference` (usually today).
    pub fn status(&self, date: NaiveDate, assignee_id: &str, reference: NaiveDate) -> OccurrenceStatus {
        if !self.rule.applies_on(date) {
            return OccurrenceStatus::NotScheduled;
        }
        let occurrence = match self.rule.kind() {
            RecurrenceKind::None => self.rule.due_date(),
            _ => date,
        };
        if self.is_completed(occurrence, assignee_id) {
            OccurrenceStatus::Done
        } else if self.is_overdue(reference, assignee_id) {
            OccurrenceStatus::Overdue
        } else {
            OccurrenceStatus::Pending
        }
    }
}

/// True iff any assignee has a record for `date`.
pub fn is_completed_by_anyone(records: &[CompletionRecord], date: NaiveDate) -> bool {
    records.iter().any(|r| r.occurrence_date == date)
}

/// Flip completion for `(date, assignee_id)`.
///
/// Removes the matching record if present (undo), otherwise appends one.
/// Returns the new ledger; the input is not modified. Apply it to the most
/// recently fetched snapshot: concurrent toggles race at the storage layer.
pub fn toggle(records: &[CompletionRecord], date: NaiveDate, assignee_id: &str) -> Vec<CompletionRecord> {
    let had = records.iter().any(|r| r.matches(date, assignee_id));
    let mut next: Vec<CompletionRecord> = records
        .iter()
        .filter(|r| !r.matches(date, assignee_id))
        .cloned()
        .collect();
    if !had {
        next.push(CompletionRecord::new(date, assignee_id));
    }
    tracing::debug!(%date, assignee = assignee_id, completed = !had, "completion toggled");
    next
}
