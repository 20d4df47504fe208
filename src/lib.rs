// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SweetCue: relationship reminders backend
//!
//! This crate provides the API behind the SweetCue app: storage of
//! reminders and the partner profile, and the dashboard engine that merges
//! reminders with projected birthdays and anniversaries and tracks the
//! user's weekly progress and completion streak.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{Clock, CueService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub clock: Arc<dyn Clock>,
    pub cue_service: CueService,
}

impl AppState {
    pub fn new(config: Config, db: FirestoreDb, clock: Arc<dyn Clock>) -> Self {
        let cue_service = CueService::new(db.clone(), clock.clone());
        Self {
            config,
            db,
            clock,
            cue_service,
        }
    }
}
