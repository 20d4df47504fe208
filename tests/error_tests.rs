// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use sweetcue::error::{AppError, ValidationError};
use sweetcue::models::{PartnerKeyDates, ReminderRecord, StoredPartner, StoredReminder};

#[test]
fn test_validation_error_maps_to_unprocessable() {
    let err: AppError = ValidationError::InvalidDate {
        field: "scheduled_date",
        value: "tomorrow-ish".to_string(),
    }
    .into();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(
        err.into_response().status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[test]
fn test_status_codes() {
    assert_eq!(
        AppError::Unauthorized.into_response().status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AppError::NotFound("x".to_string()).into_response().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        AppError::BadRequest("x".to_string())
            .into_response()
            .status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::Database("x".to_string()).into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_bad_stored_reminder_is_not_coerced() {
    let stored = StoredReminder {
        id: "r1".to_string(),
        user_id: "user-1".to_string(),
        title: "Flowers".to_string(),
        description: None,
        scheduled_date: "Invalid Date".to_string(),
        is_completed: false,
        completed_at: None,
        created_at: String::new(),
    };

    let err = ReminderRecord::try_from(stored).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid date in field 'scheduled_date': \"Invalid Date\""
    );
}

#[test]
fn test_bad_stored_partner_is_not_coerced() {
    let stored = StoredPartner {
        user_id: "user-1".to_string(),
        name: "Sam".to_string(),
        birthday: Some("31/12/1990".to_string()),
        anniversary: None,
        updated_at: String::new(),
    };

    assert!(matches!(
        PartnerKeyDates::try_from(stored),
        Err(ValidationError::InvalidDate {
            field: "birthday",
            ..
        })
    ));
}
