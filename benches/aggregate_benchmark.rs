use chrono::{Duration, NaiveDate, TimeZone, Utc, Weekday};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sweetcue::models::{PartnerKeyDates, ReminderRecord};
use sweetcue::services::{aggregate_upcoming, compute_week_progress};
use sweetcue::time_utils::CalendarPolicy;

fn benchmark_dashboard(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap();
    let policy = CalendarPolicy::utc(Weekday::Mon);

    // A heavy user: a few hundred reminders spread over a year
    let reminders: Vec<ReminderRecord> = (0..300)
        .map(|i| {
            let at = now + Duration::hours(i * 29 - 2000);
            if i % 3 == 0 {
                ReminderRecord::completed(format!("r{}", i), "Gesture", at, at)
            } else {
                ReminderRecord::pending(format!("r{}", i), "Gesture", at)
            }
        })
        .collect();

    let upcoming: Vec<ReminderRecord> = reminders
        .iter()
        .filter(|r| !r.is_completed() && r.scheduled_date >= now)
        .cloned()
        .collect();

    let partner = PartnerKeyDates {
        name: "Sam".to_string(),
        birthday: NaiveDate::from_ymd_opt(1990, 11, 2),
        anniversary: NaiveDate::from_ymd_opt(2018, 10, 30),
    };

    let mut group = c.benchmark_group("dashboard");

    group.bench_function("aggregate_upcoming", |b| {
        b.iter(|| {
            aggregate_upcoming(
                black_box(&upcoming),
                Some(&partner),
                now,
                30,
                &policy,
            )
        })
    });

    group.bench_function("compute_week_progress", |b| {
        b.iter(|| compute_week_progress(black_box(&reminders), now, &policy))
    });

    group.finish();
}

criterion_group!(benches, benchmark_dashboard);
criterion_main!(benches);
