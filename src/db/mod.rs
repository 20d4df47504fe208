// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// Reminder documents (keyed by reminder ID, carry `user_id`)
    pub const REMINDERS: &str = "reminders";
    /// Partner profiles (keyed by user ID)
    pub const PARTNERS: &str = "partners";
}
