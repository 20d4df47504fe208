// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Upcoming occurrence aggregation.
//!
//! Merges stored reminders with the partner's birthday and anniversary,
//! projected onto the current annual cycle, into one list sorted by how
//! soon each occurrence is due.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::models::{OccurrenceKind, OccurrenceSummary, PartnerKeyDates, ReminderRecord};
use crate::time_utils::{days_until, project_annual, CalendarPolicy};

/// Lookahead for projected key dates when the caller does not choose one.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 30;

/// Occurrences due within this many days form the near-term bucket.
pub const NEAR_TERM_DAYS: u32 = 3;

/// Build the sorted, urgency-annotated list of upcoming occurrences.
///
/// `reminders` must already be limited to incomplete reminders due today or
/// later within the caller's window; they are all included. Projected
/// birthdays and anniversaries are included only when due within
/// `lookahead_days`.
///
/// Ordering is by `days_until`, then reminders before birthdays before
/// anniversaries, then input order.
pub fn aggregate_upcoming(
    reminders: &[ReminderRecord],
    partner: Option<&PartnerKeyDates>,
    now: DateTime<Utc>,
    lookahead_days: u32,
    policy: &CalendarPolicy,
) -> Vec<OccurrenceSummary> {
    let today = policy.local_date(now);

    let mut occurrences: Vec<OccurrenceSummary> = reminders
        .iter()
        .map(|reminder| reminder_occurrence(reminder, now))
        .collect();

    if let Some(partner) = partner {
        let key_dates = [
            (OccurrenceKind::Birthday, partner.birthday),
            (OccurrenceKind::Anniversary, partner.anniversary),
        ];
        occurrences.extend(
            key_dates
                .into_iter()
                .filter_map(|(kind, anchor)| {
                    project_key_date(kind, anchor?, &partner.name, now, today, policy)
                })
                .filter(|occurrence| occurrence.days_until <= lookahead_days),
        );
    }

    let mut ranked: Vec<(usize, OccurrenceSummary)> = occurrences.into_iter().enumerate().collect();
    ranked.sort_by(|(ia, a), (ib, b)| {
        a.days_until
            .cmp(&b.days_until)
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| ia.cmp(ib))
    });

    ranked.into_iter().map(|(_, occurrence)| occurrence).collect()
}

fn reminder_occurrence(reminder: &ReminderRecord, now: DateTime<Utc>) -> OccurrenceSummary {
    let days = days_until(reminder.scheduled_date, now);
    OccurrenceSummary {
        id: reminder.id.clone(),
        title: reminder.title.clone(),
        description: reminder.description.clone(),
        scheduled_date: reminder.scheduled_date,
        days_until: days,
        is_urgent: days <= OccurrenceKind::Reminder.urgency_threshold_days(),
        kind: OccurrenceKind::Reminder,
    }
}

fn project_key_date(
    kind: OccurrenceKind,
    anchor: NaiveDate,
    name: &str,
    now: DateTime<Utc>,
    today: NaiveDate,
    policy: &CalendarPolicy,
) -> Option<OccurrenceSummary> {
    let date = project_annual(anchor, today)?;
    let scheduled_date = policy.start_of_day(date);
    let days = days_until(scheduled_date, now);

    let (id, title, description) = match kind {
        OccurrenceKind::Birthday => (
            format!("birthday-{}", name),
            format!("{}'s Birthday", name),
            Some(format!("Plan something special for {}", name)),
        ),
        OccurrenceKind::Anniversary => {
            let years = date.year() - anchor.year();
            (
                format!("anniversary-{}", name),
                format!("Anniversary with {}", name),
                (years > 0).then(|| format!("{} years together", years)),
            )
        }
        OccurrenceKind::Reminder => return None,
    };

    Some(OccurrenceSummary {
        id,
        title,
        description,
        scheduled_date,
        days_until: days,
        is_urgent: days <= kind.urgency_threshold_days(),
        kind,
    })
}

/// Near-term and later views over one sorted occurrence list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpcomingSplit<'a> {
    /// Due within [`NEAR_TERM_DAYS`]
    pub near_term: &'a [OccurrenceSummary],
    pub future: &'a [OccurrenceSummary],
}

/// Split a list returned by [`aggregate_upcoming`] without re-sorting.
pub fn split_near_term(sorted: &[OccurrenceSummary]) -> UpcomingSplit<'_> {
    let boundary = sorted.partition_point(|o| o.days_until <= NEAR_TERM_DAYS);
    let (near_term, future) = sorted.split_at(boundary);
    UpcomingSplit { near_term, future }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Weekday};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap()
    }

    fn policy() -> CalendarPolicy {
        CalendarPolicy::utc(Weekday::Mon)
    }

    #[test]
    fn test_anniversary_description_counts_years() {
        let partner = PartnerKeyDates {
            name: "Sam".to_string(),
            birthday: None,
            anniversary: NaiveDate::from_ymd_opt(2019, 10, 25),
        };

        let result = aggregate_upcoming(&[], Some(&partner), now(), 30, &policy());

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "anniversary-Sam");
        assert_eq!(result[0].title, "Anniversary with Sam");
        assert_eq!(result[0].description.as_deref(), Some("7 years together"));
        assert_eq!(result[0].days_until, 6);
        assert!(result[0].is_urgent);
    }

    #[test]
    fn test_ties_keep_reminders_first_in_input_order() {
        let thursday_midnight = Utc.with_ymd_and_hms(2026, 10, 22, 0, 0, 0).unwrap();
        let reminders = vec![
            ReminderRecord::pending("b", "Second", thursday_midnight),
            ReminderRecord::pending("a", "First", thursday_midnight - Duration::hours(1)),
        ];
        let partner = PartnerKeyDates {
            name: "Sam".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 10, 22),
            anniversary: NaiveDate::from_ymd_opt(2020, 10, 22),
        };

        let result = aggregate_upcoming(&reminders, Some(&partner), now(), 30, &policy());
        let ids: Vec<&str> = result.iter().map(|o| o.id.as_str()).collect();

        // All four are 3 days out
        assert!(result.iter().all(|o| o.days_until == 3));
        assert_eq!(ids, ["b", "a", "birthday-Sam", "anniversary-Sam"]);
    }

    #[test]
    fn test_lookahead_excludes_distant_key_dates() {
        let partner = PartnerKeyDates {
            name: "Sam".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 12, 25),
            anniversary: None,
        };

        assert!(aggregate_upcoming(&[], Some(&partner), now(), 30, &policy()).is_empty());
        assert_eq!(
            aggregate_upcoming(&[], Some(&partner), now(), 90, &policy()).len(),
            1
        );
    }

    #[test]
    fn test_split_near_term() {
        let reminders: Vec<ReminderRecord> = [0, 3, 4, 10]
            .iter()
            .map(|d| ReminderRecord::pending(format!("r{}", d), "R", now() + Duration::days(*d)))
            .collect();

        let sorted = aggregate_upcoming(&reminders, None, now(), 30, &policy());
        let split = split_near_term(&sorted);

        assert_eq!(split.near_term.len(), 2);
        assert_eq!(split.future.len(), 2);
        assert_eq!(split.near_term[1].days_until, 3);
        assert_eq!(split.future[0].days_until, 4);
    }
}
