//! Detect timetable clashes between a candidate schedule and an actor's
//! existing schedules.
//!
//! The same check serves both directions: enrolling a student (existing =
//! the student's other classes) and assigning a teacher (existing = the
//! teacher's other classes). Only the collection the caller supplies differs.
//! Adjacent blocks (one ends exactly when another starts) are NOT conflicts.

use serde::{Deserialize, Serialize};

use crate::interval::{TimeInterval, Weekday};
use crate::schedule::WeeklySchedule;

/// A clash between the candidate and one existing schedule on one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConflict {
    /// Id of the existing schedule the candidate overlaps.
    pub conflicts_with: String,
    pub weekday: Weekday,
    pub candidate: TimeInterval,
    pub existing: TimeInterval,
    pub overlap_minutes: u16,
}

/// Decide whether `candidate` may be added next to `existing`.
///
/// Returns the first existing schedule, in iteration order, that shares a
/// weekday with the candidate where the effective intervals overlap. Callers
/// that need a stable answer should order `existing` by a meaningful key such
/// as creation time. `None` means the candidate is clear.
///
/// An existing schedule with the candidate's own id is skipped, so re-checking
/// an edited class does not clash with its previous version.
pub fn check(candidate: &WeeklySchedule, existing: &[WeeklySchedule]) -> Option<BookingConflict> {
    let found = existing
        .iter()
        .filter(|other| other.id() != candidate.id())
        .find_map(|other| first_overlap(candidate, other));

    match &found {
        Some(c) => tracing::debug!(
            candidate = candidate.id(),
            conflicts_with = %c.conflicts_with,
            weekday = %c.weekday,
            "booking conflict"
        ),
        None => tracing::trace!(candidate = candidate.id(), checked = existing.len(), "booking clear"),
    }
    found
}

/// Report every clash between `candidate` and `existing`.
///
/// Ordered by `existing` iteration order, then by weekday (Monday first)
/// within a schedule.
pub fn find_all(candidate: &WeeklySchedule, existing: &[WeeklySchedule]) -> Vec<BookingConflict> {
    existing
        .iter()
        .filter(|other| other.id() != candidate.id())
        .flat_map(|other| overlaps_with(candidate, other))
        .collect()
}

fn first_overlap(candidate: &WeeklySchedule, other: &WeeklySchedule) -> Option<BookingConflict> {
    overlaps_with(candidate, other).next()
}

fn overlaps_with<'a>(
    candidate: &'a WeeklySchedule,
    other: &'a WeeklySchedule,
) -> impl Iterator<Item = BookingConflict> + 'a {
    candidate.blocks().filter_map(move |(weekday, mine)| {
        let theirs = other.effective_interval(weekday)?;
        if !mine.overlaps(&theirs) {
            return None;
        }
        Some(BookingConflict {
            conflicts_with: other.id().to_string(),
            weekday,
            candidate: mine,
            existing: theirs,
            overlap_minutes: mine.overlap_minutes(&theirs),
        })
    })
}
