//! Tests for range-event layout across week rows.

use academy_schedule::grid::{WeekRow, WeekStart};
use academy_schedule::layout::{layout_month, layout_week, single_day_events_on, RangeEvent};
use academy_schedule::parse_date;
use chrono::NaiveDate;

// ── Helpers ─────────────────────────────────────────────────────────────────

fn d(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

fn event(id: &str, start: &str, end: &str) -> RangeEvent {
    RangeEvent::new(id, d(start), d(end), "#4f86f7").unwrap()
}

fn week(first: &str) -> WeekRow {
    WeekRow::starting(d(first)).unwrap()
}

// ── Clipping across a week boundary ─────────────────────────────────────────

#[test]
fn event_across_month_end_reconstructs_exactly() {
    // Sunday-first rows: 2026-01-25..01-31 and 2026-02-01..02-07.
    let ev = event("trip", "2026-01-30", "2026-02-02");
    let week1 = layout_week(&week("2026-01-25"), std::slice::from_ref(&ev));
    let week2 = layout_week(&week("2026-02-01"), std::slice::from_ref(&ev));

    assert_eq!(week1.len(), 1);
    assert_eq!(week2.len(), 1);
    let (a, b) = (&week1[0], &week2[0]);

    assert_eq!((a.display_start, a.display_end), (d("2026-01-30"), d("2026-01-31")));
    assert_eq!((a.start_col, a.end_col, a.span), (5, 6, 2));
    assert!(!a.continues_from_prev);
    assert!(a.continues_to_next);
    assert!(a.shows_title());

    assert_eq!((b.display_start, b.display_end), (d("2026-02-01"), d("2026-02-02")));
    assert_eq!((b.start_col, b.end_col, b.span), (0, 1, 2));
    assert!(b.continues_from_prev);
    assert!(!b.continues_to_next);
    assert!(!b.shows_title(), "title only on the segment holding the true start");

    let days: Vec<NaiveDate> = [a, b]
        .iter()
        .flat_map(|s| s.display_start.iter_days().take(s.span))
        .collect();
    assert_eq!(
        days,
        vec![d("2026-01-30"), d("2026-01-31"), d("2026-02-01"), d("2026-02-02")]
    );
}

#[test]
fn event_longer_than_a_week_fills_middle_rows() {
    let ev = event("camp", "2026-03-04", "2026-03-20");
    let middle = layout_week(&week("2026-03-08"), std::slice::from_ref(&ev));

    assert_eq!(middle.len(), 1);
    let s = &middle[0];
    assert_eq!((s.start_col, s.end_col, s.span), (0, 6, 7));
    assert!(s.continues_from_prev && s.continues_to_next);
}

#[test]
fn single_day_and_disjoint_events_are_skipped() {
    let events = vec![
        event("exam", "2026-01-27", "2026-01-27"),
        event("before", "2026-01-10", "2026-01-12"),
        event("after", "2026-02-01", "2026-02-03"),
    ];
    assert!(layout_week(&week("2026-01-25"), &events).is_empty());
}

#[test]
fn touching_week_edges_counts_as_intersecting() {
    let events = vec![
        event("ends-sunday", "2026-01-20", "2026-01-25"),
        event("starts-saturday", "2026-01-31", "2026-02-03"),
    ];
    let segments = layout_week(&week("2026-01-25"), &events);

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].event.id, "ends-sunday");
    assert_eq!((segments[0].start_col, segments[0].span), (0, 1));
    assert_eq!(segments[1].event.id, "starts-saturday");
    assert_eq!((segments[1].start_col, segments[1].span), (6, 1));
}

// ── Ordering and stacking ───────────────────────────────────────────────────

#[test]
fn segments_ordered_by_start_column_then_id() {
    let events = vec![
        event("zeta", "2026-01-26", "2026-01-28"),
        event("alpha", "2026-01-27", "2026-01-29"),
        event("beta", "2026-01-26", "2026-01-27"),
    ];
    let ids: Vec<String> = layout_week(&week("2026-01-25"), &events)
        .into_iter()
        .map(|s| s.event.id)
        .collect();
    assert_eq!(ids, vec!["beta", "zeta", "alpha"]);
}

#[test]
fn overlapping_bars_get_distinct_lanes() {
    let events = vec![
        event("a", "2026-01-25", "2026-01-27"), // cols 0-2
        event("b", "2026-01-26", "2026-01-28"), // cols 1-3, overlaps a
        event("c", "2026-01-28", "2026-01-31"), // cols 3-6, fits after a
    ];
    let segments = layout_week(&week("2026-01-25"), &events);
    let lanes: Vec<(&str, usize)> = segments.iter().map(|s| (s.event.id.as_str(), s.lane)).collect();

    assert_eq!(lanes, vec![("a", 0), ("b", 1), ("c", 0)]);
}

// ── Month and per-cell paths ────────────────────────────────────────────────

#[test]
fn month_layout_covers_every_row() {
    let events = vec![event("trip", "2026-01-30", "2026-02-02")];
    let rows = layout_month(2026, 2, WeekStart::Monday, &events).unwrap();

    // Monday-first February 2026: Jan 26 .. Mar 1 in five rows.
    assert_eq!(rows.len(), 5);
    let (first_row, first_segments) = &rows[0];
    assert_eq!(first_row.first(), d("2026-01-26"));
    assert_eq!(first_segments.len(), 1);
    assert_eq!((first_segments[0].start_col, first_segments[0].end_col), (4, 6));
    assert!(first_segments[0].continues_to_next);

    let (_, second_segments) = &rows[1];
    assert_eq!((second_segments[0].start_col, second_segments[0].span), (0, 1));
    assert!(second_segments[0].continues_from_prev);

    assert!(rows[2..].iter().all(|(_, segs)| segs.is_empty()));
}

#[test]
fn single_day_events_use_the_cell_path() {
    let events = vec![
        event("exam", "2026-01-27", "2026-01-27"),
        event("trip", "2026-01-26", "2026-01-28"),
    ];
    let on_day = single_day_events_on(d("2026-01-27"), &events);
    assert_eq!(on_day.len(), 1);
    assert_eq!(on_day[0].id, "exam");
}

#[test]
fn inverted_range_rejected() {
    assert!(RangeEvent::new("bad", d("2026-01-10"), d("2026-01-09"), "").is_err());
    let json = r#"{"id": "bad", "start_date": "2026-01-10", "end_date": "2026-01-09", "color": "red"}"#;
    assert!(serde_json::from_str::<RangeEvent>(json).is_err());
}
