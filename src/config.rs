// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use crate::services::aggregator::DEFAULT_LOOKAHEAD_DAYS;
use crate::time_utils::CalendarPolicy;
use chrono::{FixedOffset, Offset, Utc, Weekday};
use std::env;

/// Largest lookahead a client may request.
pub const MAX_LOOKAHEAD_DAYS: u32 = 366;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL (allowed CORS origin)
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,

    // --- Cue engine defaults ---
    /// First day of the "this week" window
    pub week_start: Weekday,
    /// Lookahead used when the client does not pass one
    pub default_lookahead_days: u32,
    /// Offset defining the calendar day when the client does not pass one
    pub default_utc_offset: FixedOffset,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:8081".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            week_start: Weekday::Mon,
            default_lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            default_utc_offset: Utc.fix(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let week_start = match env::var("WEEK_START") {
            Ok(raw) => parse_week_start(&raw)?,
            Err(_) => Weekday::Mon,
        };

        let default_lookahead_days = match env::var("DEFAULT_LOOKAHEAD_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|days| *days <= MAX_LOOKAHEAD_DAYS)
                .ok_or(ConfigError::Invalid("DEFAULT_LOOKAHEAD_DAYS", raw))?,
            Err(_) => DEFAULT_LOOKAHEAD_DAYS,
        };

        let default_utc_offset = match env::var("DEFAULT_TZ_OFFSET_MINUTES") {
            Ok(raw) => raw
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(|minutes| minutes.checked_mul(60))
                .and_then(FixedOffset::east_opt)
                .ok_or(ConfigError::Invalid("DEFAULT_TZ_OFFSET_MINUTES", raw))?,
            Err(_) => Utc.fix(),
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            week_start,
            default_lookahead_days,
            default_utc_offset,
        })
    }

    /// Calendar policy used when a request carries no offset of its own.
    pub fn calendar_policy(&self) -> CalendarPolicy {
        CalendarPolicy {
            week_start: self.week_start,
            utc_offset: self.default_utc_offset,
        }
    }
}

/// Only Sunday and Monday week starts are supported.
fn parse_week_start(raw: &str) -> Result<Weekday, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "monday" | "mon" => Ok(Weekday::Mon),
        "sunday" | "sun" => Ok(Weekday::Sun),
        _ => Err(ConfigError::Invalid("WEEK_START", raw.to_string())),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
