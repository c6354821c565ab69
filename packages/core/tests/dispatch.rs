//! End-to-end dispatch of real driver errors and axum responses.
//!
//! Driver errors come from an in-memory SQLite database through `sqlx`, so
//! the mapping is exercised against what the driver actually produces.

use axum::{
    body::Body,
    http::StatusCode,
    response::IntoResponse,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::{Connection, SqliteConnection};

use app_errors::{
    classify::DriverErrorKind, config::Environment, AppError, Caught, DriverError, ErrorCode,
    ErrorHandler, ErrorLogger, ValidationError,
};

async fn connect() -> SqliteConnection {
    let mut conn = SqliteConnection::connect("sqlite::memory:").await.unwrap();
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .await
        .unwrap();
    sqlx::query("CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT NOT NULL UNIQUE)")
        .execute(&mut conn)
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE orders (id INTEGER PRIMARY KEY, user_id INTEGER NOT NULL REFERENCES users(id))",
    )
    .execute(&mut conn)
    .await
    .unwrap();
    conn
}

fn handler() -> ErrorHandler {
    ErrorHandler::new(ErrorLogger::new(Environment::Test))
}

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn sqlite_unique_violation_maps_to_already_exists() {
    let mut conn = connect().await;
    sqlx::query("INSERT INTO users (email) VALUES ('a@example.com')")
        .execute(&mut conn)
        .await
        .unwrap();

    let err = sqlx::query("INSERT INTO users (email) VALUES ('a@example.com')")
        .execute(&mut conn)
        .await
        .unwrap_err();

    let driver = DriverError::from(err);
    assert_eq!(driver.kind(), DriverErrorKind::UniqueViolation);

    let handled = handler().handle(driver);
    assert_eq!(handled.status, StatusCode::CONFLICT);
    assert_eq!(handled.body.code, 4001);
    assert_eq!(handled.body.message, ErrorCode::AlreadyExists.user_message());
}

#[tokio::test]
async fn sqlite_foreign_key_violation_maps_to_validation_error() {
    let mut conn = connect().await;

    let err = sqlx::query("INSERT INTO orders (user_id) VALUES (42)")
        .execute(&mut conn)
        .await
        .unwrap_err();

    let handled = handler().handle(err);
    assert_eq!(handled.status, StatusCode::BAD_REQUEST);
    assert_eq!(handled.body.code, 3000);
    assert_eq!(
        handled.body.details,
        Some(json!({ "message": "related resource not found" }))
    );
}

#[tokio::test]
async fn other_sqlite_errors_map_to_database_error_without_leaking_text() {
    let mut conn = connect().await;

    let err = sqlx::query("SELECT * FROM missing_table")
        .execute(&mut conn)
        .await
        .unwrap_err();

    let handled = handler().handle(err);
    assert_eq!(handled.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(handled.body.code, 9001);

    let body = serde_json::to_string(&handled.body).unwrap();
    assert!(!body.contains("missing_table"));
}

#[tokio::test]
async fn boxed_sqlx_error_is_classified_as_driver_error() {
    let mut conn = connect().await;
    sqlx::query("INSERT INTO users (email) VALUES ('b@example.com')")
        .execute(&mut conn)
        .await
        .unwrap();
    let err = sqlx::query("INSERT INTO users (email) VALUES ('b@example.com')")
        .execute(&mut conn)
        .await
        .unwrap_err();

    let handled = handler().handle_boxed(Box::new(err));
    assert_eq!(handled.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn handled_error_renders_as_http_response() {
    let handled = handler().handle(ValidationError::default().with_issue(["email"], "invalid"));
    let resp = handled.into_response();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = json_body(resp.into_body()).await;
    assert_eq!(
        json,
        json!({
            "error": "AppError",
            "code": 3000,
            "message": ErrorCode::ValidationError.user_message(),
            "details": { "fields": [{ "field": "email", "message": "invalid" }] }
        })
    );
}

#[tokio::test]
async fn app_error_renders_as_http_response() {
    let resp = AppError::new(ErrorCode::RateLimitExceeded).into_response();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let json = json_body(resp.into_body()).await;
    assert_eq!(json["code"], 5000);
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn upstream_json_payloads_are_classified_by_shape() {
    let handler = handler();

    let handled = handler.handle(Caught::from_value(json!({
        "code": "PGRST301",
        "message": "JWT expired",
        "hint": null
    })));
    assert_eq!(handled.status, StatusCode::UNAUTHORIZED);

    let handled = handler.handle(Caught::from_value(json!({
        "name": "ZodError",
        "issues": [{ "path": ["email"], "message": "invalid" }]
    })));
    assert_eq!(handled.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        handled.body.details,
        Some(json!({ "fields": [{ "field": "email", "message": "invalid" }] }))
    );

    let handled = handler.handle(Caught::from_value(json!("something odd")));
    assert_eq!(handled.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(handled.body.code, 9000);
}

#[tokio::test]
async fn untagged_issue_list_is_handled_as_internal_error() {
    let handled = handler().handle(Caught::from_value(json!({
        "errors": [{
            "message": "internal: pg connection refused at 10.0.0.5",
            "path": ["user", "email"]
        }]
    })));

    assert_eq!(handled.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(handled.body.code, 9000);
    assert!(handled.body.details.is_none());

    let body = serde_json::to_string(&handled.body).unwrap();
    assert!(!body.contains("10.0.0.5"));
}
