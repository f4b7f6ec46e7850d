//! Storage collaborator boundary.
//!
//! The engine never owns persistence. These traits describe the minimum a
//! store must offer; the flow functions fetch a snapshot, run the pure engine
//! over it, and (for toggles) hand the result back to the store. Storage
//! failures are returned to the caller unchanged and are never retried here.
//!
//! [`InMemoryStore`] implements every trait over plain collections and is
//! what the CLI and tests run against.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conflict::{self, BookingConflict};
use crate::error::ScheduleError;
use crate::grid::{WeekRow, WeekStart};
use crate::layout::{self, RangeEvent, WeekSegment};
use crate::occurrence::{self, CompletionRecord, OccurrenceStatus, OccurrenceTracker};
use crate::recurrence::RecurrenceRule;
use crate::schedule::WeeklySchedule;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid stored data: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Whose timetable a schedule lookup is for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "id", rename_all = "lowercase")]
pub enum Actor {
    Teacher(String),
    Student(String),
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Teacher(id) => write!(f, "teacher:{}", id),
            Actor::Student(id) => write!(f, "student:{}", id),
        }
    }
}

pub trait ScheduleSource {
    /// Every schedule currently bound to `actor`, in a stable order.
    fn schedules_for(&self, actor: &Actor) -> StoreResult<Vec<WeeklySchedule>>;
}

pub trait CompletionStore {
    fn rule_for(&self, todo_id: &str) -> StoreResult<RecurrenceRule>;

    fn records_for(&self, todo_id: &str) -> StoreResult<Vec<CompletionRecord>>;

    /// Replace the ledger for `todo_id`. Stores wanting stronger consistency
    /// than last-write-wins should make this conditional on the snapshot.
    fn commit_records(&mut self, todo_id: &str, records: Vec<CompletionRecord>) -> StoreResult<()>;
}

pub trait EventSource {
    /// Range events whose `[start_date, end_date]` intersects `[from, to]`.
    fn events_between(&self, from: NaiveDate, to: NaiveDate) -> StoreResult<Vec<RangeEvent>>;
}

/// Check a candidate against everything already bound to `actor`.
pub fn check_booking<S: ScheduleSource + ?Sized>(
    source: &S,
    actor: &Actor,
    candidate: &WeeklySchedule,
) -> StoreResult<Option<BookingConflict>> {
    let existing = source.schedules_for(actor)?;
    tracing::debug!(%actor, candidate = candidate.id(), existing = existing.len(), "checking booking");
    Ok(conflict::check(candidate, &existing))
}

/// Toggle one occurrence against the latest ledger and commit the result.
///
/// Returns the committed ledger.
pub fn toggle_completion<S: CompletionStore + ?Sized>(
    store: &mut S,
    todo_id: &str,
    date: NaiveDate,
    assignee_id: &str,
) -> StoreResult<Vec<CompletionRecord>> {
    let records = store.records_for(todo_id)?;
    let next = occurrence::toggle(&records, date, assignee_id);
    store.commit_records(todo_id, next.clone())?;
    Ok(next)
}

/// Status of one to-do occurrence for one assignee, as of `reference`.
pub fn occurrence_status<S: CompletionStore + ?Sized>(
    store: &S,
    todo_id: &str,
    date: NaiveDate,
    assignee_id: &str,
    reference: NaiveDate,
) -> StoreResult<OccurrenceStatus> {
    let rule = store.rule_for(todo_id)?;
    let records = store.records_for(todo_id)?;
    Ok(OccurrenceTracker::new(&rule, &records).status(date, assignee_id, reference))
}

/// Fetch the events visible in a month and lay out each row.
pub fn month_layout<S: EventSource + ?Sized>(
    source: &S,
    year: i32,
    month: u32,
    week_start: WeekStart,
) -> StoreResult<Vec<(WeekRow, Vec<WeekSegment>)>> {
    let rows = crate::grid::month_grid(year, month, week_start)?;
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Ok(Vec::new());
    };
    let events = source.events_between(first.first(), last.last())?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let segments = layout::layout_week(&row, &events);
            (row, segments)
        })
        .collect())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TodoEntry {
    rule: RecurrenceRule,
    #[serde(default)]
    records: Vec<CompletionRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct ActorSchedules {
    actor: Actor,
    schedules: Vec<WeeklySchedule>,
}

/// Store backed by in-process collections.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    schedules: HashMap<Actor, Vec<WeeklySchedule>>,
    todos: HashMap<String, TodoEntry>,
    events: Vec<RangeEvent>,
}

/// JSON snapshot layout accepted by [`InMemoryStore::from_json`].
#[derive(Deserialize)]
struct Snapshot {
    #[serde(default)]
    schedules: Vec<ActorSchedules>,
    #[serde(default)]
    todos: HashMap<String, TodoEntry>,
    #[serde(default)]
    events: Vec<RangeEvent>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot of the form
    /// `{"schedules": [{"actor": {...}, "schedules": [...]}], "todos": {...}, "events": [...]}`.
    ///
    /// All entities go through their validating constructors.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        let mut store = Self::new();
        for entry in snapshot.schedules {
            store
                .schedules
                .entry(entry.actor)
                .or_default()
                .extend(entry.schedules);
        }
        store.todos = snapshot.todos;
        store.events = snapshot.events;
        Ok(store)
    }

    pub fn bind_schedule(&mut self, actor: Actor, schedule: WeeklySchedule) {
        self.schedules.entry(actor).or_default().push(schedule);
    }

    pub fn insert_todo(&mut self, todo_id: impl Into<String>, rule: RecurrenceRule) {
        self.todos.insert(
            todo_id.into(),
            TodoEntry {
                rule,
                records: Vec::new(),
            },
        );
    }

    pub fn add_event(&mut self, event: RangeEvent) {
        self.events.push(event);
    }

    fn todo(&self, todo_id: &str) -> StoreResult<&TodoEntry> {
        self.todos
            .get(todo_id)
            .ok_or_else(|| StoreError::NotFound(format!("todo '{}'", todo_id)))
    }
}

impl ScheduleSource for InMemoryStore {
    fn schedules_for(&self, actor: &Actor) -> StoreResult<Vec<WeeklySchedule>> {
        Ok(self.schedules.get(actor).cloned().unwrap_or_default())
    }
}

impl CompletionStore for InMemoryStore {
    fn rule_for(&self, todo_id: &str) -> StoreResult<RecurrenceRule> {
        Ok(self.todo(todo_id)?.rule.clone())
    }

    fn records_for(&self, todo_id: &str) -> StoreResult<Vec<CompletionRecord>> {
        Ok(self.todo(todo_id)?.records.clone())
    }

    fn commit_records(&mut self, todo_id: &str, records: Vec<CompletionRecord>) -> StoreResult<()> {
        let entry = self
            .todos
            .get_mut(todo_id)
            .ok_or_else(|| StoreError::NotFound(format!("todo '{}'", todo_id)))?;
        entry.records = records;
        tracing::trace!(todo = todo_id, records = entry.records.len(), "records committed");
        Ok(())
    }
}

impl EventSource for InMemoryStore {
    fn events_between(&self, from: NaiveDate, to: NaiveDate) -> StoreResult<Vec<RangeEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.intersects(from, to))
            .cloned()
            .collect())
    }
}
