use academy_schedule::layout::{layout_month, RangeEvent};
use academy_schedule::recurrence::{RecurrenceKind, RecurrenceRule};
use academy_schedule::WeekStart;
use chrono::{Days, NaiveDate};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn busy_month() -> Vec<RangeEvent> {
    let base = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
    (0..200u64)
        .map(|i| {
            let start = base.checked_add_days(Days::new(i % 28)).unwrap();
            let end = start.checked_add_days(Days::new(i % 9)).unwrap();
            RangeEvent::new(format!("ev-{i}"), start, end, "blue").unwrap()
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let events = busy_month();
    c.bench_function("layout_month_200_events", |b| {
        b.iter(|| layout_month(2026, 2, WeekStart::Sunday, black_box(&events)).unwrap())
    });
}

fn bench_occurrence_marks(c: &mut Criterion) {
    let anchor = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
    let weekly = RecurrenceRule::recurring(RecurrenceKind::Weekly, anchor, anchor).unwrap();
    let monthly = RecurrenceRule::recurring(RecurrenceKind::Monthly, anchor, anchor).unwrap();
    let from = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let to = NaiveDate::from_ymd_opt(2027, 12, 31).unwrap();

    c.bench_function("weekly_marks_two_years", |b| {
        b.iter(|| black_box(&weekly).occurrences_between(from, to))
    });
    c.bench_function("monthly_marks_two_years", |b| {
        b.iter(|| black_box(&monthly).occurrences_between(from, to))
    });
}

criterion_group!(benches, bench_layout, bench_occurrence_marks);
criterion_main!(benches);
