// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for reminders, the partner profile and the account.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{PartnerKeyDates, ReminderRecord, StoredPartner, StoredReminder};
use crate::services::cues::to_records;
use crate::time_utils::{format_utc_rfc3339, parse_calendar_date, parse_instant};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/reminders", get(list_reminders).post(create_reminder))
        .route("/api/reminders/{id}", delete(delete_reminder))
        .route("/api/reminders/{id}/complete", post(complete_reminder))
        .route("/api/partner", get(get_partner).put(update_partner))
        .route("/api/account", delete(delete_account))
}

// ─── Reminders ───────────────────────────────────────────────

#[derive(Serialize, Clone, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct ReminderResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_date: String,
    pub is_completed: bool,
    pub completed_at: Option<String>,
}

impl From<ReminderRecord> for ReminderResponse {
    fn from(record: ReminderRecord) -> Self {
        Self {
            is_completed: record.is_completed(),
            completed_at: record.completed_at().map(format_utc_rfc3339),
            id: record.id,
            title: record.title,
            description: record.description,
            scheduled_date: format_utc_rfc3339(record.scheduled_date),
        }
    }
}

#[derive(Deserialize)]
struct RemindersQuery {
    /// Cursor for forward pagination (opaque token).
    cursor: Option<String>,
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    50
}

const MAX_LIMIT: u32 = 100;
const CURSOR_PARTS: usize = 3;

/// Position after the last reminder of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ReminderCursor {
    scheduled_date: DateTime<Utc>,
    reminder_id: String,
}

fn parse_cursor(cursor: Option<&str>) -> Result<Option<ReminderCursor>> {
    cursor
        .map(|raw| {
            let invalid_cursor = || AppError::BadRequest("Invalid 'cursor' parameter".to_string());

            let decoded = URL_SAFE_NO_PAD.decode(raw).map_err(|_| invalid_cursor())?;
            let decoded_str = std::str::from_utf8(&decoded).map_err(|_| invalid_cursor())?;

            // Reminder IDs may contain ':', so only split off the timestamp
            let parts: Vec<&str> = decoded_str.splitn(CURSOR_PARTS, ':').collect();
            if parts.len() != CURSOR_PARTS || parts[2].is_empty() {
                return Err(invalid_cursor());
            }

            let seconds = parts[0].parse::<i64>().map_err(|_| invalid_cursor())?;
            let nanos = parts[1].parse::<u32>().map_err(|_| invalid_cursor())?;
            let scheduled_date =
                DateTime::from_timestamp(seconds, nanos).ok_or_else(invalid_cursor)?;

            Ok(ReminderCursor {
                scheduled_date,
                reminder_id: parts[2].to_string(),
            })
        })
        .transpose()
}

fn encode_cursor(cursor: &ReminderCursor) -> String {
    let payload = format!(
        "{}:{}:{}",
        cursor.scheduled_date.timestamp(),
        cursor.scheduled_date.timestamp_subsec_nanos(),
        cursor.reminder_id
    );
    URL_SAFE_NO_PAD.encode(payload)
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct RemindersResponse {
    pub reminders: Vec<ReminderResponse>,
    pub next_cursor: Option<String>,
}

/// Take one page of reminders ordered by (scheduled_date, id), after `cursor`.
fn paginate(
    mut records: Vec<ReminderRecord>,
    cursor: Option<&ReminderCursor>,
    limit: usize,
) -> (Vec<ReminderRecord>, Option<ReminderCursor>) {
    records.sort_by(|a, b| {
        a.scheduled_date
            .cmp(&b.scheduled_date)
            .then_with(|| a.id.cmp(&b.id))
    });

    let start = cursor.map_or(0, |c| {
        records.partition_point(|r| {
            (r.scheduled_date, r.id.as_str()) <= (c.scheduled_date, c.reminder_id.as_str())
        })
    });

    let mut page: Vec<ReminderRecord> = records.into_iter().skip(start).take(limit + 1).collect();
    let has_more = page.len() > limit;
    page.truncate(limit);

    let next_cursor = if has_more {
        page.last().map(|r| ReminderCursor {
            scheduled_date: r.scheduled_date,
            reminder_id: r.id.clone(),
        })
    } else {
        None
    };

    (page, next_cursor)
}

/// List the user's reminders, earliest first.
///
/// Reminder sets are small per user, so pages are cut in memory.
async fn list_reminders(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<RemindersQuery>,
) -> Result<Json<RemindersResponse>> {
    let limit = params.limit.clamp(1, MAX_LIMIT) as usize;
    let cursor = parse_cursor(params.cursor.as_deref())?;

    tracing::debug!(user_id = %user.user_id, limit, cursor = ?params.cursor, "Listing reminders");

    let records = to_records(state.db.get_all_reminders(&user.user_id).await?)?;
    let (page, next_cursor) = paginate(records, cursor.as_ref(), limit);

    Ok(Json(RemindersResponse {
        reminders: page.into_iter().map(ReminderResponse::from).collect(),
        next_cursor: next_cursor.as_ref().map(encode_cursor),
    }))
}

#[derive(Deserialize, Validate)]
pub struct CreateReminderRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    pub scheduled_date: String,
}

/// Create a reminder.
async fn create_reminder(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateReminderRequest>,
) -> Result<Json<ReminderResponse>> {
    body.validate()?;

    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title must not be blank".to_string()));
    }

    let scheduled_date = parse_instant("scheduled_date", &body.scheduled_date)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let doc = StoredReminder {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.user_id.clone(),
        title: title.to_string(),
        description: body
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        scheduled_date: format_utc_rfc3339(scheduled_date),
        is_completed: false,
        completed_at: None,
        created_at: format_utc_rfc3339(state.clock.now()),
    };

    state.db.set_reminder(&doc).await?;
    tracing::info!(user_id = %user.user_id, reminder_id = %doc.id, "Reminder created");

    Ok(Json(ReminderRecord::try_from(doc)?.into()))
}

/// Mark a reminder completed.
async fn complete_reminder(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(reminder_id): Path<String>,
) -> Result<Json<ReminderResponse>> {
    let record = state
        .cue_service
        .complete_reminder(&user.user_id, &reminder_id)
        .await?;
    Ok(Json(record.into()))
}

/// Delete a reminder owned by the user.
async fn delete_reminder(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(reminder_id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let owned = state
        .db
        .get_reminder(&reminder_id)
        .await?
        .is_some_and(|doc| doc.user_id == user.user_id);
    if !owned {
        return Err(AppError::NotFound(format!(
            "Reminder {} not found",
            reminder_id
        )));
    }

    state.db.delete_reminder(&reminder_id).await?;
    tracing::info!(user_id = %user.user_id, reminder_id = %reminder_id, "Reminder deleted");

    Ok(Json(DeleteResponse {
        success: true,
        deleted: 1,
    }))
}

// ─── Partner Profile ─────────────────────────────────────────

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct PartnerResponse {
    pub name: String,
    /// `YYYY-MM-DD`
    pub birthday: Option<String>,
    /// `YYYY-MM-DD`
    pub anniversary: Option<String>,
}

impl From<PartnerKeyDates> for PartnerResponse {
    fn from(partner: PartnerKeyDates) -> Self {
        Self {
            name: partner.name,
            birthday: partner.birthday.map(|d| d.to_string()),
            anniversary: partner.anniversary.map(|d| d.to_string()),
        }
    }
}

/// Get the user's partner profile.
async fn get_partner(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PartnerResponse>> {
    let doc = state
        .db
        .fetch_partner_key_dates(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Partner profile not set".to_string()))?;

    Ok(Json(PartnerKeyDates::try_from(doc)?.into()))
}

#[derive(Deserialize, Validate)]
pub struct UpdatePartnerRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// `YYYY-MM-DD`; omit or leave empty to clear
    pub birthday: Option<String>,
    /// `YYYY-MM-DD`; omit or leave empty to clear
    pub anniversary: Option<String>,
}

/// Parse an optional request date, treating empty as absent.
fn parse_request_date(raw: Option<&str>, field: &'static str) -> Result<Option<String>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_calendar_date(field, value)
            .map(|date| Some(date.to_string()))
            .map_err(|e| AppError::BadRequest(e.to_string())),
    }
}

/// Replace the user's partner profile.
async fn update_partner(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UpdatePartnerRequest>,
) -> Result<Json<PartnerResponse>> {
    body.validate()?;

    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name must not be blank".to_string()));
    }

    let doc = StoredPartner {
        user_id: user.user_id.clone(),
        name: name.to_string(),
        birthday: parse_request_date(body.birthday.as_deref(), "birthday")?,
        anniversary: parse_request_date(body.anniversary.as_deref(), "anniversary")?,
        updated_at: format_utc_rfc3339(state.clock.now()),
    };

    state.db.set_partner(&doc).await?;
    tracing::info!(user_id = %user.user_id, "Partner profile updated");

    Ok(Json(PartnerKeyDates::try_from(doc)?.into()))
}

// ─── Account Deletion ────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct DeleteResponse {
    pub success: bool,
    /// Number of documents removed
    pub deleted: u32,
}

/// Delete the user's reminders and partner profile.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DeleteResponse>> {
    tracing::info!(user_id = %user.user_id, "User-initiated account deletion");

    let deleted = state.db.delete_user_data(&user.user_id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        deleted: u32::try_from(deleted).unwrap_or(u32::MAX),
    }))
}
