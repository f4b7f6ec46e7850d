//! Tests for the storage-facing flows over the in-memory store.

use academy_schedule::interval::{TimeInterval, Weekday};
use academy_schedule::occurrence::OccurrenceStatus;
use academy_schedule::ports::{
    check_booking, month_layout, occurrence_status, toggle_completion, Actor, CompletionStore,
    InMemoryStore, StoreError,
};
use academy_schedule::recurrence::{RecurrenceKind, RecurrenceRule};
use academy_schedule::schedule::WeeklySchedule;
use academy_schedule::{parse_date, WeekStart};
use chrono::NaiveDate;

fn d(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

fn schedule(id: &str, days: &[Weekday], start: &str, end: &str) -> WeeklySchedule {
    WeeklySchedule::new(id, days.iter().copied(), TimeInterval::parse(start, end).unwrap()).unwrap()
}

#[test]
fn booking_checks_only_the_requested_actor() {
    let mut store = InMemoryStore::new();
    let teacher = Actor::Teacher("t-kim".into());
    let student = Actor::Student("s-lee".into());
    store.bind_schedule(teacher.clone(), schedule("math-a", &[Weekday::Tue], "16:00", "17:00"));
    store.bind_schedule(student.clone(), schedule("piano", &[Weekday::Tue], "16:30", "17:30"));

    let candidate = schedule("math-b", &[Weekday::Tue], "17:00", "18:00");

    assert!(check_booking(&store, &teacher, &candidate).unwrap().is_none());
    let conflict = check_booking(&store, &student, &candidate).unwrap().unwrap();
    assert_eq!(conflict.conflicts_with, "piano");

    let nobody = Actor::Student("s-new".into());
    assert!(check_booking(&store, &nobody, &candidate).unwrap().is_none());
}

#[test]
fn toggle_completion_commits_and_undoes() {
    let mut store = InMemoryStore::new();
    let rule = RecurrenceRule::recurring(RecurrenceKind::Weekly, d("2026-01-05"), d("2026-01-05")).unwrap();
    store.insert_todo("vocab", rule);

    let after = toggle_completion(&mut store, "vocab", d("2026-01-12"), "s1").unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(store.records_for("vocab").unwrap(), after);
    assert_eq!(
        occurrence_status(&store, "vocab", d("2026-01-12"), "s1", d("2026-01-12")).unwrap(),
        OccurrenceStatus::Done
    );

    let undone = toggle_completion(&mut store, "vocab", d("2026-01-12"), "s1").unwrap();
    assert!(undone.is_empty());
    assert!(store.records_for("vocab").unwrap().is_empty());
}

#[test]
fn missing_todo_surfaces_not_found() {
    let mut store = InMemoryStore::new();
    let err = toggle_completion(&mut store, "ghost", d("2026-01-12"), "s1").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn snapshot_loads_through_validation() {
    let json = r#"{
        "schedules": [
            {"actor": {"role": "teacher", "id": "t1"},
             "schedules": [{"id": "math", "weekdays": ["mon"], "default": {"start": "14:00", "end": "15:00"}}]}
        ],
        "todos": {
            "essay": {"rule": {"kind": "none", "anchor_date": "2026-01-10", "due_date": "2026-01-10"}}
        },
        "events": [
            {"id": "trip", "start_date": "2026-01-30", "end_date": "2026-02-02", "color": "teal"}
        ]
    }"#;
    let store = InMemoryStore::from_json(json).unwrap();

    let candidate = schedule("science", &[Weekday::Mon], "14:30", "15:30");
    let conflict = check_booking(&store, &Actor::Teacher("t1".into()), &candidate).unwrap();
    assert_eq!(conflict.unwrap().conflicts_with, "math");

    assert_eq!(
        occurrence_status(&store, "essay", d("2026-01-10"), "s1", d("2026-01-11")).unwrap(),
        OccurrenceStatus::Overdue
    );

    let rows = month_layout(&store, 2026, 1, WeekStart::Sunday).unwrap();
    let last = &rows.last().unwrap().1;
    assert_eq!(last.len(), 1);
    assert!(last[0].continues_to_next);
}

#[test]
fn invalid_snapshot_rejected() {
    let json = r#"{"events": [{"id": "bad", "start_date": "2026-02-02", "end_date": "2026-01-30"}]}"#;
    assert!(matches!(InMemoryStore::from_json(json), Err(StoreError::Invalid(_))));
}
