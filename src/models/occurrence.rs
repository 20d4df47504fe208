// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived dashboard values: upcoming occurrences and weekly progress.
//!
//! Nothing here is persisted. Both types are recomputed on every request.

use chrono::{DateTime, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Where an occurrence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub enum OccurrenceKind {
    Reminder,
    Birthday,
    Anniversary,
}

impl OccurrenceKind {
    /// Days before the occurrence at which it is flagged urgent.
    pub fn urgency_threshold_days(self) -> u32 {
        match self {
            OccurrenceKind::Reminder => 2,
            OccurrenceKind::Birthday | OccurrenceKind::Anniversary => 7,
        }
    }
}

/// A single upcoming occurrence, annotated for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct OccurrenceSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Concrete date of this occurrence (projected for birthdays/anniversaries)
    pub scheduled_date: DateTime<Utc>,
    pub days_until: u32,
    pub is_urgent: bool,
    #[serde(rename = "type")]
    pub kind: OccurrenceKind,
}

/// Completion summary for the current week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct WeekProgress {
    pub completed_this_week: u32,
    pub missed_this_week: u32,
    pub total_this_week: u32,
    /// Consecutive days with a completion, or the weekly completion count
    /// when there is no running streak
    pub streak: u32,
}
