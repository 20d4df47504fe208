// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod aggregator;
pub mod clock;
pub mod cues;
pub mod progress;

pub use aggregator::{
    aggregate_upcoming, split_near_term, UpcomingSplit, DEFAULT_LOOKAHEAD_DAYS, NEAR_TERM_DAYS,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use cues::CueService;
pub use progress::{compute_week_progress, STREAK_LOOKBACK_DAYS};
