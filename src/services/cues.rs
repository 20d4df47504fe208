// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cue service - connects the stores to the aggregation engine.
//!
//! Reads a consistent pair of reminders and partner dates for one user,
//! validates them into typed records and runs the pure calculators with
//! the injected clock.

use std::sync::Arc;

use crate::db::FirestoreDb;
use crate::error::{AppError, Result, ValidationError};
use crate::models::{
    OccurrenceSummary, PartnerKeyDates, ReminderRecord, StoredReminder, WeekProgress,
};
use crate::services::aggregator::aggregate_upcoming;
use crate::services::clock::Clock;
use crate::services::progress::compute_week_progress;
use crate::time_utils::CalendarPolicy;

/// Dashboard queries for a single user.
#[derive(Clone)]
pub struct CueService {
    db: FirestoreDb,
    clock: Arc<dyn Clock>,
}

impl CueService {
    pub fn new(db: FirestoreDb, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Upcoming occurrences within `lookahead_days`, soonest first.
    pub async fn upcoming(
        &self,
        user_id: &str,
        lookahead_days: u32,
        policy: &CalendarPolicy,
    ) -> Result<Vec<OccurrenceSummary>> {
        let now = self.clock.now();
        let start_of_today = policy.start_of_day(policy.local_date(now));

        let (reminder_docs, partner_doc) = tokio::try_join!(
            self.db
                .fetch_incomplete_upcoming_reminders(user_id, start_of_today, lookahead_days),
            self.db.fetch_partner_key_dates(user_id),
        )?;

        let reminders = to_records(reminder_docs)?;
        let partner = partner_doc.map(PartnerKeyDates::try_from).transpose()?;

        let occurrences =
            aggregate_upcoming(&reminders, partner.as_ref(), now, lookahead_days, policy);

        tracing::debug!(
            user_id,
            reminders = reminders.len(),
            has_partner = partner.is_some(),
            occurrences = occurrences.len(),
            "Aggregated upcoming occurrences"
        );

        Ok(occurrences)
    }

    /// Completion counts for the current week and the running streak.
    pub async fn progress(&self, user_id: &str, policy: &CalendarPolicy) -> Result<WeekProgress> {
        let now = self.clock.now();
        let reminders = to_records(self.db.get_all_reminders(user_id).await?)?;

        let progress = compute_week_progress(&reminders, now, policy);

        tracing::debug!(
            user_id,
            completed = progress.completed_this_week,
            missed = progress.missed_this_week,
            streak = progress.streak,
            "Computed week progress"
        );

        Ok(progress)
    }

    /// Mark a reminder completed now. Completing twice keeps the first timestamp.
    pub async fn complete_reminder(
        &self,
        user_id: &str,
        reminder_id: &str,
    ) -> Result<ReminderRecord> {
        let mut doc = self
            .db
            .get_reminder(reminder_id)
            .await?
            .filter(|doc| doc.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("Reminder {} not found", reminder_id)))?;

        if !doc.is_completed {
            doc.complete(self.clock.now());
            self.db.set_reminder(&doc).await?;
            tracing::info!(user_id, reminder_id, "Reminder completed");
        }

        Ok(ReminderRecord::try_from(doc)?)
    }
}

/// Validate stored documents, failing on the first malformed one.
pub fn to_records(
    docs: Vec<StoredReminder>,
) -> std::result::Result<Vec<ReminderRecord>, ValidationError> {
    docs.into_iter().map(ReminderRecord::try_from).collect()
}
