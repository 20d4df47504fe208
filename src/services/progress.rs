// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weekly completion summary and daily streak.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashSet;

use crate::models::{ReminderRecord, WeekProgress};
use crate::time_utils::CalendarPolicy;

/// How many days back from today the streak walk may go.
pub const STREAK_LOOKBACK_DAYS: u32 = 30;

/// Summarize the current week and the running completion streak.
///
/// `reminders` is the user's full reminder set, completed or not.
pub fn compute_week_progress(
    reminders: &[ReminderRecord],
    now: DateTime<Utc>,
    policy: &CalendarPolicy,
) -> WeekProgress {
    let today = policy.local_date(now);
    let (week_start, week_end) = policy.week_range(today);

    let mut completed_this_week = 0u32;
    let mut missed_this_week = 0u32;
    for reminder in reminders {
        let scheduled_day = policy.local_date(reminder.scheduled_date);
        if scheduled_day < week_start || scheduled_day >= week_end {
            continue;
        }
        if reminder.is_completed() {
            completed_this_week += 1;
        } else if scheduled_day < today {
            missed_this_week += 1;
        }
    }

    let completion_days: HashSet<NaiveDate> = reminders
        .iter()
        .filter_map(ReminderRecord::completed_at)
        .map(|at| policy.local_date(at))
        .collect();

    let streak = match consecutive_days(&completion_days, today) {
        0 => completed_this_week,
        days => days,
    };

    WeekProgress {
        completed_this_week,
        missed_this_week,
        total_this_week: completed_this_week + missed_this_week,
        streak,
    }
}

/// Count days with a completion, walking back from `today` until the first gap.
fn consecutive_days(completion_days: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    (0..STREAK_LOOKBACK_DAYS)
        .take_while(|back| completion_days.contains(&(today - Duration::days(i64::from(*back)))))
        .count() as u32
}
