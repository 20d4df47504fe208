// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar helpers shared by the cue engine.
//!
//! Every "today" and "this week" decision goes through a [`CalendarPolicy`]
//! and an explicit `now`; nothing in here reads the system clock.

use crate::error::ValidationError;
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, SecondsFormat, Utc,
    Weekday,
};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Defines what a calendar day and a week mean for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarPolicy {
    /// First day of the week (Sunday or Monday in practice)
    pub week_start: Weekday,
    /// Offset from UTC of the user's wall clock
    pub utc_offset: FixedOffset,
}

impl CalendarPolicy {
    /// Policy with calendar days aligned to UTC.
    pub fn utc(week_start: Weekday) -> Self {
        Self {
            week_start,
            utc_offset: Utc.fix(),
        }
    }

    /// Same week start, different wall-clock offset.
    pub fn with_offset(self, utc_offset: FixedOffset) -> Self {
        Self { utc_offset, ..self }
    }

    /// Calendar day of `instant` on the user's wall clock.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.utc_offset).date_naive()
    }

    /// Instant at which `date` begins on the user's wall clock.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let local_midnight = date.and_time(NaiveTime::MIN);
        (local_midnight - Duration::seconds(i64::from(self.utc_offset.local_minus_utc()))).and_utc()
    }

    /// Half-open `[start, end)` range of calendar days forming the week of `today`.
    pub fn week_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let back = (7 + today.weekday().num_days_from_monday()
            - self.week_start.num_days_from_monday())
            % 7;
        let start = today - Duration::days(i64::from(back));
        (start, start + Duration::days(7))
    }
}

/// Whole days from `now` until `target`, rounded up and floored at zero.
pub fn days_until(target: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let millis = (target - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    let days = (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Project the month/day of `anchor` onto the annual cycle containing `today`.
///
/// Returns this year's date unless that day is already behind `today`, in
/// which case next year's date is returned. Feb 29 lands on Mar 1 in a
/// non-leap year. `None` only when the year leaves chrono's range.
pub fn project_annual(anchor: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = on_year(anchor, today.year())?;
    if this_year >= today {
        return Some(this_year);
    }
    on_year(anchor, today.year().checked_add(1)?)
}

fn on_year(anchor: NaiveDate, year: i32) -> Option<NaiveDate> {
    anchor
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Parse a stored timestamp for computation.
///
/// Accepts RFC 3339 or a bare `YYYY-MM-DD` date (UTC midnight).
pub fn parse_instant(field: &'static str, raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| ValidationError::InvalidDate {
            field,
            value: raw.to_string(),
        })
}

/// Parse a stored calendar date (birthday, anniversary).
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, whose date is taken as
/// written in its own offset.
pub fn parse_calendar_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| ValidationError::InvalidDate {
            field,
            value: raw.to_string(),
        })
}

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
