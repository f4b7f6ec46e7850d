//! WASM bindings for academy-schedule.
//!
//! Exposes conflict checks, recurrence membership, completion toggling and
//! month layout to the portal's browser code via `wasm-bindgen`. All complex
//! types are passed as JSON strings; dates are `YYYY-MM-DD` strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p academy-schedule-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg/ \
//!   target/wasm32-unknown-unknown/release/academy_schedule_wasm.wasm
//! ```

use academy_schedule::layout::{RangeEvent, WeekSegment};
use academy_schedule::occurrence::{CompletionRecord, OccurrenceTracker};
use academy_schedule::recurrence::RecurrenceRule;
use academy_schedule::schedule::WeeklySchedule;
use academy_schedule::{conflict, format_date, layout_month, parse_date, toggle, WeekStart};
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct WeekRowDto {
    dates: Vec<String>,
    segments: Vec<WeekSegment>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_day(s: &str) -> Result<NaiveDate, JsValue> {
    parse_date(s).map_err(js_err)
}

fn from_json<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Check a candidate schedule against an actor's existing schedules.
///
/// `candidate_json` is one schedule object, `existing_json` an array of them.
/// Returns the first conflict as a JSON object, or `"null"` when clear.
#[wasm_bindgen(js_name = "checkConflict")]
pub fn check_conflict(candidate_json: &str, existing_json: &str) -> Result<String, JsValue> {
    let candidate: WeeklySchedule = from_json(candidate_json, "candidate")?;
    let existing: Vec<WeeklySchedule> = from_json(existing_json, "existing schedules")?;
    to_json(&conflict::check(&candidate, &existing))
}

/// Whether a recurrence rule applies on `date`.
#[wasm_bindgen(js_name = "appliesOn")]
pub fn applies_on(rule_json: &str, date: &str) -> Result<bool, JsValue> {
    let rule: RecurrenceRule = from_json(rule_json, "rule")?;
    Ok(rule.applies_on(parse_day(date)?))
}

/// Occurrence dates of a rule within `[from, to]`, as a JSON array of strings.
#[wasm_bindgen(js_name = "occurrencesBetween")]
pub fn occurrences_between(rule_json: &str, from: &str, to: &str) -> Result<String, JsValue> {
    let rule: RecurrenceRule = from_json(rule_json, "rule")?;
    let dates: Vec<String> = rule
        .occurrences_between(parse_day(from)?, parse_day(to)?)
        .into_iter()
        .map(format_date)
        .collect();
    to_json(&dates)
}

/// Status (`not_scheduled` | `pending` | `done` | `overdue`) of one occurrence.
#[wasm_bindgen(js_name = "occurrenceStatus")]
pub fn occurrence_status(
    rule_json: &str,
    records_json: &str,
    date: &str,
    assignee_id: &str,
    today: &str,
) -> Result<String, JsValue> {
    let rule: RecurrenceRule = from_json(rule_json, "rule")?;
    let records: Vec<CompletionRecord> = from_json(records_json, "records")?;
    let status = OccurrenceTracker::new(&rule, &records).status(
        parse_day(date)?,
        assignee_id,
        parse_day(today)?,
    );
    to_json(&status)
}

/// Toggle completion for `(date, assignee_id)`; returns the new records array.
#[wasm_bindgen(js_name = "toggleCompletion")]
pub fn toggle_completion(records_json: &str, date: &str, assignee_id: &str) -> Result<String, JsValue> {
    let records: Vec<CompletionRecord> = from_json(records_json, "records")?;
    to_json(&toggle(&records, parse_day(date)?, assignee_id))
}

/// Lay out range events over a month grid.
///
/// `week_start` is `"sunday"` or `"monday"`. Returns an array of rows, each
/// with its seven `dates` and the bar `segments` to draw.
#[wasm_bindgen(js_name = "layoutMonth")]
pub fn layout_month_js(
    events_json: &str,
    year: i32,
    month: u32,
    week_start: &str,
) -> Result<String, JsValue> {
    let events: Vec<RangeEvent> = from_json(events_json, "events")?;
    let week_start: WeekStart = week_start.parse().map_err(js_err)?;
    let rows: Vec<WeekRowDto> = layout_month(year, month, week_start, &events)
        .map_err(js_err)?
        .into_iter()
        .map(|(row, segments)| WeekRowDto {
            dates: row.dates().iter().copied().map(format_date).collect(),
            segments,
        })
        .collect();
    to_json(&rows)
}
