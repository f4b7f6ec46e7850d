//! Lay out multi-day range events as bars across week rows.
//!
//! Each event that spans more than one day is clipped to every week row it
//! touches. The per-row segments carry continuation flags so a renderer can
//! square off the clipped side and show the title only on the segment that
//! holds the event's true start. Concatenating an event's segments across rows
//! reproduces its full `[start_date, end_date]` range with no gaps or repeats.
//!
//! Single-day events do not go through this path; see [`single_day_events_on`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::grid::{month_grid, WeekRow, WeekStart};

/// A calendar item covering an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RangeEventRepr")]
pub struct RangeEvent {
    pub id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub color: String,
}

#[derive(Deserialize)]
struct RangeEventRepr {
    id: String,
    #[serde(with = "crate::date::strict")]
    start_date: NaiveDate,
    #[serde(with = "crate::date::strict")]
    end_date: NaiveDate,
    #[serde(default)]
    color: String,
}

impl TryFrom<RangeEventRepr> for RangeEvent {
    type Error = ScheduleError;

    fn try_from(r: RangeEventRepr) -> Result<Self> {
        RangeEvent::new(r.id, r.start_date, r.end_date, r.color)
    }
}

impl RangeEvent {
    /// # Errors
    /// Returns `ScheduleError::InvalidRange` when `end_date < start_date`.
    pub fn new(
        id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        color: impl Into<String>,
    ) -> Result<Self> {
        let id = id.into();
        if end_date < start_date {
            return Err(ScheduleError::InvalidRange {
                id,
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            id,
            start_date,
            end_date,
            color: color.into(),
        })
    }

    pub fn is_multi_day(&self) -> bool {
        self.end_date > self.start_date
    }

    pub fn intersects(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start_date <= to && self.end_date >= from
    }
}

/// One event's bar within one week row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSegment {
    pub event: RangeEvent,
    pub display_start: NaiveDate,
    pub display_end: NaiveDate,
    pub start_col: usize,
    pub end_col: usize,
    pub span: usize,
    pub continues_from_prev: bool,
    pub continues_to_next: bool,
    /// Stacking row within the week; overlapping bars never share a lane.
    pub lane: usize,
}

impl WeekSegment {
    /// The title is drawn only on the segment containing the true start.
    pub fn shows_title(&self) -> bool {
        !self.continues_from_prev
    }
}

/// Segments for every multi-day event intersecting `week`.
///
/// Ordered by ascending `start_col`, ties broken by event id. Lanes are
/// assigned first-fit in that order. Events outside the week produce nothing.
pub fn layout_week(week: &WeekRow, events: &[RangeEvent]) -> Vec<WeekSegment> {
    let week_start = week.first();
    let week_end = week.last();

    let mut segments: Vec<WeekSegment> = events
        .iter()
        .filter(|e| e.is_multi_day() && e.intersects(week_start, week_end))
        .filter_map(|e| {
            let display_start = e.start_date.max(week_start);
            let display_end = e.end_date.min(week_end);
            let start_col = week.column_of(display_start)?;
            let end_col = week.column_of(display_end)?;
            Some(WeekSegment {
                event: e.clone(),
                display_start,
                display_end,
                start_col,
                end_col,
                span: end_col - start_col + 1,
                continues_from_prev: e.start_date < week_start,
                continues_to_next: e.end_date > week_end,
                lane: 0,
            })
        })
        .collect();

    segments.sort_by(|a, b| {
        a.start_col
            .cmp(&b.start_col)
            .then_with(|| a.event.id.cmp(&b.event.id))
    });
    assign_lanes(&mut segments);
    segments
}

/// Lay out every row of a month grid.
///
/// # Errors
/// Returns `ScheduleError::InvalidMonth` for an invalid month.
pub fn layout_month(
    year: i32,
    month: u32,
    week_start: WeekStart,
    events: &[RangeEvent],
) -> Result<Vec<(WeekRow, Vec<WeekSegment>)>> {
    let rows = month_grid(year, month, week_start)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let segments = layout_week(&row, events);
            (row, segments)
        })
        .collect())
}

/// Events that start and end on `date`, for the per-cell rendering path.
pub fn single_day_events_on(date: NaiveDate, events: &[RangeEvent]) -> Vec<&RangeEvent> {
    events
        .iter()
        .filter(|e| !e.is_multi_day() && e.start_date == date)
        .collect()
}

// Greedy first-fit: each lane remembers the last column it occupies.
fn assign_lanes(segments: &mut [WeekSegment]) {
    let mut lane_ends: Vec<usize> = Vec::new();
    for segment in segments.iter_mut() {
        match lane_ends.iter().position(|&end| end < segment.start_col) {
            Some(lane) => {
                lane_ends[lane] = segment.end_col;
                segment.lane = lane;
            }
            None => {
                segment.lane = lane_ends.len();
                lane_ends.push(segment.end_col);
            }
        }
    }
}
