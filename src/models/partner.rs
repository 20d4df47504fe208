// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Partner profile model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time_utils::parse_calendar_date;

/// Stored partner profile in Firestore (one per user, keyed by user ID).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPartner {
    pub user_id: String,
    pub name: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub birthday: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub anniversary: Option<String>,
    /// Last update timestamp (RFC 3339)
    #[serde(default)]
    pub updated_at: String,
}

/// The partner's name and the dates that recur every year.
///
/// Only month and day of each date are used for projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerKeyDates {
    pub name: String,
    pub birthday: Option<NaiveDate>,
    pub anniversary: Option<NaiveDate>,
}

impl TryFrom<StoredPartner> for PartnerKeyDates {
    type Error = ValidationError;

    fn try_from(doc: StoredPartner) -> Result<Self, Self::Error> {
        let name = doc.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }

        Ok(Self {
            name: name.to_string(),
            birthday: parse_optional(&doc.birthday, "birthday")?,
            anniversary: parse_optional(&doc.anniversary, "anniversary")?,
        })
    }
}

/// Empty strings are treated as "not set"; the mobile form writes them.
fn parse_optional(
    raw: &Option<String>,
    field: &'static str,
) -> Result<Option<NaiveDate>, ValidationError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_calendar_date(field, value).map(Some),
    }
}
