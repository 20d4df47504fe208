// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard routes: upcoming occurrences and weekly progress.

use crate::config::{Config, MAX_LOOKAHEAD_DAYS};
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{OccurrenceSummary, WeekProgress};
use crate::services::split_near_term;
use crate::time_utils::CalendarPolicy;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Real-world offsets span UTC-12:00 to UTC+14:00.
const MAX_TZ_OFFSET_MINUTES: i32 = 14 * 60;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/upcoming", get(get_upcoming))
        .route("/api/progress", get(get_progress))
}

/// Calendar policy for a request: configured week start, client or default offset.
fn resolve_policy(config: &Config, tz_offset_minutes: Option<i32>) -> Result<CalendarPolicy> {
    let policy = config.calendar_policy();
    let Some(minutes) = tz_offset_minutes else {
        return Ok(policy);
    };

    if minutes.unsigned_abs() > MAX_TZ_OFFSET_MINUTES.unsigned_abs() {
        return Err(AppError::BadRequest(format!(
            "'tz_offset_minutes' must be within ±{}",
            MAX_TZ_OFFSET_MINUTES
        )));
    }

    let offset = FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
        AppError::BadRequest("Invalid 'tz_offset_minutes' parameter".to_string())
    })?;
    Ok(policy.with_offset(offset))
}

// ─── Upcoming ────────────────────────────────────────────────

#[derive(Deserialize)]
struct UpcomingQuery {
    lookahead_days: Option<u32>,
    /// Minutes east of UTC of the user's clock
    tz_offset_minutes: Option<i32>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/lib/generated/")
)]
pub struct UpcomingResponse {
    /// Every occurrence, soonest first
    pub occurrences: Vec<OccurrenceSummary>,
    /// Due within the next three days
    pub near_term: Vec<OccurrenceSummary>,
    /// Due later than that
    pub future: Vec<OccurrenceSummary>,
}

/// Get the upcoming reminders, birthday and anniversary for the current user.
async fn get_upcoming(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<UpcomingQuery>,
) -> Result<Json<UpcomingResponse>> {
    let lookahead_days = params
        .lookahead_days
        .unwrap_or(state.config.default_lookahead_days);
    if lookahead_days > MAX_LOOKAHEAD_DAYS {
        return Err(AppError::BadRequest(format!(
            "'lookahead_days' must be at most {}",
            MAX_LOOKAHEAD_DAYS
        )));
    }
    let policy = resolve_policy(&state.config, params.tz_offset_minutes)?;

    let occurrences = state
        .cue_service
        .upcoming(&user.user_id, lookahead_days, &policy)
        .await?;

    let split = split_near_term(&occurrences);
    let near_term = split.near_term.to_vec();
    let future = split.future.to_vec();

    Ok(Json(UpcomingResponse {
        occurrences,
        near_term,
        future,
    }))
}

// ─── Progress ────────────────────────────────────────────────

#[derive(Deserialize)]
struct ProgressQuery {
    tz_offset_minutes: Option<i32>,
}

/// Get this week's completion summary and the current streak.
async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ProgressQuery>,
) -> Result<Json<WeekProgress>> {
    let policy = resolve_policy(&state.config, params.tz_offset_minutes)?;
    let progress = state.cue_service.progress(&user.user_id, &policy).await?;
    Ok(Json(progress))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_resolve_policy_defaults_to_config() {
        let config = Config::test_default();
        let policy = resolve_policy(&config, None).unwrap();

        assert_eq!(policy.week_start, Weekday::Mon);
        assert_eq!(policy.utc_offset.local_minus_utc(), 0);
    }

    #[test]
    fn test_resolve_policy_applies_offset() {
        let config = Config::test_default();
        let policy = resolve_policy(&config, Some(-420)).unwrap();

        assert_eq!(policy.utc_offset.local_minus_utc(), -420 * 60);
    }

    #[test]
    fn test_resolve_policy_rejects_out_of_range() {
        let config = Config::test_default();
        assert!(matches!(
            resolve_policy(&config, Some(15 * 60)),
            Err(AppError::BadRequest(_))
        ));
    }
}
