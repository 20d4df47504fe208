// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod occurrence;
pub mod partner;
pub mod reminder;

pub use occurrence::{OccurrenceKind, OccurrenceSummary, WeekProgress};
pub use partner::{PartnerKeyDates, StoredPartner};
pub use reminder::{ReminderRecord, ReminderStatus, StoredReminder};
