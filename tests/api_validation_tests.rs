// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API input validation tests.
//!
//! All of these requests are rejected before the database is touched, so
//! they run against the offline mock.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

async fn send(method: &str, uri: &str, json: Option<&str>) -> StatusCode {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("user-1", &state.config.jwt_signing_key);

    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));
    let body = match json {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    app.oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_lookahead_too_large() {
    let status = send("GET", "/api/upcoming?lookahead_days=400", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tz_offset_out_of_range() {
    let status = send("GET", "/api/progress?tz_offset_minutes=1000", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_cursor() {
    let status = send("GET", "/api/reminders?cursor=%21%21%21", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_reminder_unparseable_date() {
    let status = send(
        "POST",
        "/api/reminders",
        Some(r#"{"title": "Flowers", "scheduled_date": "next friday"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_reminder_blank_title() {
    let status = send(
        "POST",
        "/api/reminders",
        Some(r#"{"title": "   ", "scheduled_date": "2026-10-21"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_reminder_title_too_long() {
    let body = format!(
        r#"{{"title": "{}", "scheduled_date": "2026-10-21"}}"#,
        "a".repeat(201)
    );
    let status = send("POST", "/api/reminders", Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_partner_bad_birthday() {
    let status = send(
        "PUT",
        "/api/partner",
        Some(r#"{"name": "Sam", "birthday": "June 15"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_partner_missing_name() {
    let status = send("PUT", "/api/partner", Some(r#"{"name": ""}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
