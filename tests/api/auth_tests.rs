//! Authentication API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{unique_email, unique_name, TestApp, TEST_PASSWORD};

#[tokio::test]
async fn test_register_with_valid_data() {
    let app = TestApp::new();
    let email = unique_email();

    let response = app
        .server
        .post("/api/v1/auth/register")
        .json(&json!({
            "name": unique_name(),
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["user"]["email"], email.to_lowercase());
    assert_eq!(body["tokenType"], "Bearer");
    assert!(body["accessToken"].as_str().is_some());
    assert!(body["sessionId"].as_str().is_some());
}

#[tokio::test]
async fn test_register_with_invalid_email_fails() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/auth/register")
        .json(&json!({
            "name": "Test User",
            "email": "not-an-email",
            "password": TEST_PASSWORD,
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_with_short_password_fails() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/v1/auth/register")
        .json(&json!({
            "name": "Test User",
            "email": unique_email(),
            "password": "short",
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_with_duplicate_email_fails() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let response = app
        .server
        .post("/api/v1/auth/register")
        .json(&json!({
            "name": unique_name(),
            "email": user.email.to_uppercase(),
            "password": TEST_PASSWORD,
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_opens_a_new_session() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let response = app
        .server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": user.email, "password": TEST_PASSWORD }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let session_id = body["sessionId"].as_str().unwrap().to_string();
    assert_ne!(session_id, user.session_id.to_string());

    let session = app.sessions.get(session_id.parse().unwrap()).unwrap();
    assert!(session.is_logged_in);
    assert_eq!(session.user_id, user.id);
}

#[tokio::test]
async fn test_login_with_wrong_password_fails() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let response = app
        .server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": user.email, "password": "wrong-password" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_marks_session_logged_out() {
    let app = TestApp::new();
    let user = app.register_user().await;

    app.server
        .post("/api/v1/auth/logout")
        .authorization_bearer(&user.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let session = app.sessions.get(user.session_id).unwrap();
    assert!(!session.is_logged_in);
    assert!(session.logged_out_at.is_some());

    // The token dies with its session
    app.server
        .post("/api/v1/auth/logout")
        .authorization_bearer(&user.token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_requires_token() {
    let app = TestApp::new();

    app.server
        .post("/api/v1/auth/logout")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_lookup_returns_live_session() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let response = app
        .server
        .get("/api/v1/auth/session")
        .authorization_bearer(&user.token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], user.session_id.to_string());
    assert_eq!(body["userId"], user.id.to_string());
    assert!(body["lastActivity"].is_string());
}

#[tokio::test]
async fn test_session_lookup_without_session_is_null() {
    let app = TestApp::new();

    let anonymous = app.server.get("/api/v1/auth/session").await;
    anonymous.assert_status_ok();
    assert_eq!(anonymous.json::<Value>(), Value::Null);

    let garbage = app
        .server
        .get("/api/v1/auth/session")
        .authorization_bearer("not-a-jwt")
        .await;
    garbage.assert_status_ok();
    assert_eq!(garbage.json::<Value>(), Value::Null);
}

#[tokio::test]
async fn test_session_lookup_after_logout_is_null() {
    let app = TestApp::new();
    let user = app.register_user().await;

    app.server
        .post("/api/v1/auth/logout")
        .authorization_bearer(&user.token)
        .await;

    let response = app
        .server
        .get("/api/v1/auth/session")
        .authorization_bearer(&user.token)
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), Value::Null);
}
