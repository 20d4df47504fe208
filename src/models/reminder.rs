// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reminder model for storage and for the cue engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time_utils::{format_utc_rfc3339, parse_instant};

/// Stored reminder document in Firestore.
///
/// Dates are kept as strings so that a bad value written by an older client
/// is reported on read instead of failing deserialization of the whole page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReminder {
    /// Document ID
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Display title
    pub title: String,
    /// Optional display text
    #[serde(default)]
    pub description: Option<String>,
    /// When the gesture is due (RFC 3339 or `YYYY-MM-DD`)
    pub scheduled_date: String,
    #[serde(default)]
    pub is_completed: bool,
    /// When the reminder was completed (RFC 3339)
    #[serde(default)]
    pub completed_at: Option<String>,
    /// When the document was created (RFC 3339)
    #[serde(default)]
    pub created_at: String,
}

/// Completion state of a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderStatus {
    Pending,
    Completed { at: DateTime<Utc> },
}

/// A validated reminder, as consumed by the aggregator and the streak calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRecord {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_date: DateTime<Utc>,
    pub status: ReminderStatus,
}

impl ReminderRecord {
    /// A reminder that has not been completed yet.
    pub fn pending(
        id: impl Into<String>,
        title: impl Into<String>,
        scheduled_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            scheduled_date,
            status: ReminderStatus::Pending,
        }
    }

    /// A reminder completed at `completed_at`.
    pub fn completed(
        id: impl Into<String>,
        title: impl Into<String>,
        scheduled_date: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            status: ReminderStatus::Completed { at: completed_at },
            ..Self::pending(id, title, scheduled_date)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, ReminderStatus::Completed { .. })
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            ReminderStatus::Completed { at } => Some(at),
            ReminderStatus::Pending => None,
        }
    }
}

impl TryFrom<StoredReminder> for ReminderRecord {
    type Error = ValidationError;

    fn try_from(doc: StoredReminder) -> Result<Self, Self::Error> {
        let scheduled_date = parse_instant("scheduled_date", &doc.scheduled_date)?;

        let status = match (doc.is_completed, doc.completed_at.as_deref()) {
            (true, Some(raw)) => ReminderStatus::Completed {
                at: parse_instant("completed_at", raw)?,
            },
            // Legacy documents completed before completed_at existed
            (true, None) => ReminderStatus::Completed { at: scheduled_date },
            (false, Some(_)) => return Err(ValidationError::CompletionMismatch { id: doc.id }),
            (false, None) => ReminderStatus::Pending,
        };

        Ok(Self {
            id: doc.id,
            title: doc.title,
            description: doc.description,
            scheduled_date,
            status,
        })
    }
}

impl StoredReminder {
    /// Mark this document completed at `at`.
    pub fn complete(&mut self, at: DateTime<Utc>) {
        self.is_completed = true;
        self.completed_at = Some(format_utc_rfc3339(at));
    }
}
