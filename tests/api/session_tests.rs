//! Session-update and session listing API tests

use axum::http::StatusCode;
use chrono::Duration;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::{TestApp, TEST_PASSWORD};

#[tokio::test]
async fn test_update_stores_reported_total_and_bumps_activity() {
    let app = TestApp::new();
    let user = app.register_user().await;
    let before = app.sessions.get(user.session_id).unwrap();

    app.clock.advance(Duration::minutes(30));
    let response = app
        .server
        .post("/api/v1/sessions/update")
        .authorization_bearer(&user.token)
        .json(&json!({ "sessionId": user.session_id, "totalActiveTime": 42_000 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["totalActiveTime"], 42_000);

    let after = app.sessions.get(user.session_id).unwrap();
    assert_eq!(after.total_active_time_ms, 42_000);
    assert_eq!(after.last_activity, before.last_activity + Duration::minutes(30));
}

#[tokio::test]
async fn test_update_replaces_rather_than_adds() {
    let app = TestApp::new();
    let user = app.register_user().await;

    for total in [5_000, 12_000] {
        app.server
            .post("/api/v1/sessions/update")
            .authorization_bearer(&user.token)
            .json(&json!({ "sessionId": user.session_id, "totalActiveTime": total }))
            .await
            .assert_status_ok();
    }

    assert_eq!(app.sessions.get(user.session_id).unwrap().total_active_time_ms, 12_000);
}

#[tokio::test]
async fn test_update_unknown_session_is_not_found() {
    let app = TestApp::new();
    let user = app.register_user().await;

    app.server
        .post("/api/v1/sessions/update")
        .authorization_bearer(&user.token)
        .json(&json!({ "sessionId": Uuid::new_v4(), "totalActiveTime": 1000 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_total_beyond_storable_range() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let response = app
        .server
        .post("/api/v1/sessions/update")
        .authorization_bearer(&user.token)
        .json(&json!({ "sessionId": user.session_id, "totalActiveTime": u64::MAX }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], 10002);
    assert_eq!(app.sessions.get(user.session_id).unwrap().total_active_time_ms, 0);
}

#[tokio::test]
async fn test_update_logged_out_session_is_not_found() {
    let app = TestApp::new();
    let user = app.register_user().await;

    // Second session for the same user so the caller stays authenticated
    let login: Value = app
        .server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": user.email, "password": TEST_PASSWORD }))
        .await
        .json();
    let second_token = login["accessToken"].as_str().unwrap().to_string();

    app.server
        .post("/api/v1/auth/logout")
        .authorization_bearer(&user.token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    app.server
        .post("/api/v1/sessions/update")
        .authorization_bearer(&second_token)
        .json(&json!({ "sessionId": user.session_id, "totalActiveTime": 1000 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_other_users_session_is_forbidden() {
    let app = TestApp::new();
    let alice = app.register_user().await;
    let bob = app.register_user().await;

    app.server
        .post("/api/v1/sessions/update")
        .authorization_bearer(&bob.token)
        .json(&json!({ "sessionId": alice.session_id, "totalActiveTime": 1000 }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    assert_eq!(app.sessions.get(alice.session_id).unwrap().total_active_time_ms, 0);
}

#[tokio::test]
async fn test_update_requires_token() {
    let app = TestApp::new();

    app.server
        .post("/api/v1/sessions/update")
        .json(&json!({ "sessionId": Uuid::new_v4(), "totalActiveTime": 1000 }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_sessions_returns_only_callers_sessions() {
    let app = TestApp::new();
    let alice = app.register_user().await;
    let bob = app.register_user().await;

    app.clock.advance(Duration::minutes(1));
    app.server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": alice.email, "password": TEST_PASSWORD }))
        .await
        .assert_status_ok();

    let response = app
        .server
        .get("/api/v1/sessions")
        .authorization_bearer(&alice.token)
        .await;

    response.assert_status_ok();
    let sessions: Vec<Value> = response.json();
    assert_eq!(sessions.len(), 2);
    assert!(sessions
        .iter()
        .all(|s| s["userId"] == alice.id.to_string()));
    assert!(sessions
        .iter()
        .all(|s| s["id"] != bob.session_id.to_string()));
    // Most recently active first
    assert_ne!(sessions[0]["id"], alice.session_id.to_string());
}
