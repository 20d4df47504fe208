// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Reminders (the reminder store)
//! - Partners (the partner profile store, one document per user)

use chrono::{DateTime, Duration, Utc};

use crate::db::collections;
use crate::error::AppError;
use crate::models::{StoredPartner, StoredReminder};
use crate::time_utils::parse_instant;

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Reminder Store ──────────────────────────────────────────

    /// Get a reminder by document ID.
    pub async fn get_reminder(&self, reminder_id: &str) -> Result<Option<StoredReminder>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::REMINDERS)
            .obj()
            .one(reminder_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace a reminder.
    pub async fn set_reminder(&self, reminder: &StoredReminder) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::REMINDERS)
            .document_id(&reminder.id)
            .object(reminder)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a reminder.
    pub async fn delete_reminder(&self, reminder_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::REMINDERS)
            .document_id(reminder_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get every reminder owned by a user, earliest first.
    pub async fn get_all_reminders(&self, user_id: &str) -> Result<Vec<StoredReminder>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::REMINDERS)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id.clone())]))
            .order_by([(
                "scheduled_date",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Incomplete reminders due from `from` through the end of calendar day
    /// `from + within_days`.
    ///
    /// `from` is normally the start of the user's current day, so reminders
    /// due earlier today are still returned. Stored dates come in more than
    /// one shape, so the window is applied to the parsed instant rather than
    /// in the query.
    pub async fn fetch_incomplete_upcoming_reminders(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        within_days: u32,
    ) -> Result<Vec<StoredReminder>, AppError> {
        let owner = user_id.to_string();
        let docs: Vec<StoredReminder> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::REMINDERS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(owner.clone()),
                    q.field("is_completed").eq(false),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let fetched = docs.len();
        let upcoming = retain_within_window(docs, from, within_days);
        tracing::debug!(
            user_id,
            fetched,
            kept = upcoming.len(),
            "Fetched incomplete reminders"
        );

        Ok(upcoming)
    }

    // ─── Partner Profile Store ───────────────────────────────────

    /// Get the partner profile for a user, if one has been saved.
    pub async fn fetch_partner_key_dates(
        &self,
        user_id: &str,
    ) -> Result<Option<StoredPartner>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PARTNERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace the partner profile for a user.
    pub async fn set_partner(&self, partner: &StoredPartner) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PARTNERS)
            .document_id(&partner.user_id)
            .object(partner)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    // ─── Account Deletion ──────────────────────────────────────────

    /// Delete ALL data for a user.
    ///
    /// Removes every reminder owned by the user and the partner profile.
    /// Returns the number of documents deleted.
    pub async fn delete_user_data(&self, user_id: &str) -> Result<usize, AppError> {
        let reminders = self.get_all_reminders(user_id).await?;
        let count = reminders.len();

        self.batch_delete(&reminders, collections::REMINDERS, |r: &StoredReminder| {
            r.id.clone()
        })
        .await?;
        tracing::debug!(user_id, count, "Deleted reminders");

        let had_partner = self.fetch_partner_key_dates(user_id).await?.is_some();
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::PARTNERS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let deleted_count = count + usize::from(had_partner);
        tracing::info!(user_id, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }
}

/// Keep reminders scheduled in `[from, from + within_days + 1 day)`.
///
/// Documents whose date does not parse are kept so that conversion reports
/// them instead of the window hiding them.
pub fn retain_within_window(
    docs: Vec<StoredReminder>,
    from: DateTime<Utc>,
    within_days: u32,
) -> Vec<StoredReminder> {
    let upper = from + Duration::days(i64::from(within_days) + 1);
    docs.into_iter()
        .filter(|doc| match parse_instant("scheduled_date", &doc.scheduled_date) {
            Ok(at) => at >= from && at < upper,
            Err(_) => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn doc(id: &str, scheduled_date: &str) -> StoredReminder {
        StoredReminder {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            title: format!("Reminder {}", id),
            description: None,
            scheduled_date: scheduled_date.to_string(),
            is_completed: false,
            completed_at: None,
            created_at: "2026-10-01T00:00:00Z".to_string(),
        }
    }

    fn ids(docs: &[StoredReminder]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_window_includes_bare_date_due_today() {
        let from = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
        let docs = vec![doc("bare", "2026-10-19"), doc("yesterday", "2026-10-18")];

        let kept = retain_within_window(docs, from, 30);

        assert_eq!(ids(&kept), vec!["bare"]);
    }

    #[test]
    fn test_window_compares_offset_dates_as_instants() {
        // 22:00 at UTC-5 on the 19th is 03:00Z on the 20th
        let from = Utc.with_ymd_and_hms(2026, 10, 20, 0, 0, 0).unwrap();
        let docs = vec![
            doc("late-evening", "2026-10-19T22:00:00-05:00"),
            doc("early", "2026-10-19T18:00:00-05:00"),
        ];

        let kept = retain_within_window(docs, from, 30);

        assert_eq!(ids(&kept), vec!["late-evening"]);
    }

    #[test]
    fn test_window_upper_bound_is_end_of_last_day() {
        let from = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
        let docs = vec![
            doc("last-day", "2026-10-21T23:59:59Z"),
            doc("past-window", "2026-10-22T00:00:00Z"),
            doc("last-day-bare", "2026-10-21"),
        ];

        let kept = retain_within_window(docs, from, 2);

        assert_eq!(ids(&kept), vec!["last-day", "last-day-bare"]);
    }

    #[test]
    fn test_window_keeps_unparseable_dates_for_validation() {
        let from = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();
        let kept = retain_within_window(vec![doc("broken", "Invalid Date")], from, 30);

        assert_eq!(ids(&kept), vec!["broken"]);
    }
}
