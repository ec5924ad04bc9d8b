//! Stale-session sweep against sessions created through the API

use chrono::Duration;
use serde_json::Value;
use tokio_test::assert_ok;

use crate::common::TestApp;

#[tokio::test]
async fn test_sweep_logs_out_only_sessions_past_threshold() {
    let app = TestApp::new();
    let idle = app.register_user().await;

    app.clock.advance(Duration::hours(2));
    let recent = app.register_user().await;

    // idle: last activity 5h ago, recent: 3h ago
    app.clock.advance(Duration::hours(3));
    let swept = assert_ok!(app.state.sweeper().sweep_once().await);

    assert_eq!(swept, 1);
    assert!(!app.sessions.get(idle.session_id).unwrap().is_logged_in);
    assert!(app.sessions.get(recent.session_id).unwrap().is_logged_in);

    let lookup = app
        .server
        .get("/api/v1/auth/session")
        .authorization_bearer(&idle.token)
        .await;
    assert_eq!(lookup.json::<Value>(), Value::Null);

    let lookup = app
        .server
        .get("/api/v1/auth/session")
        .authorization_bearer(&recent.token)
        .await;
    assert_eq!(lookup.json::<Value>()["id"], recent.session_id.to_string());
}

#[tokio::test]
async fn test_reconciliation_keeps_session_alive() {
    let app = TestApp::new();
    let user = app.register_user().await;

    app.clock.advance(Duration::hours(3));
    app.server
        .post("/api/v1/sessions/update")
        .authorization_bearer(&user.token)
        .json(&serde_json::json!({ "sessionId": user.session_id, "totalActiveTime": 60_000 }))
        .await
        .assert_status_ok();

    app.clock.advance(Duration::hours(2));
    let swept = assert_ok!(app.state.sweeper().sweep_once().await);

    assert_eq!(swept, 0);
    assert!(app.sessions.get(user.session_id).unwrap().is_logged_in);
}

#[tokio::test]
async fn test_sweep_is_idempotent() {
    let app = TestApp::new();
    let user = app.register_user().await;

    app.clock.advance(Duration::hours(5));
    let sweeper = app.state.sweeper();

    assert_eq!(sweeper.sweep_once().await.unwrap(), 1);
    assert_eq!(sweeper.sweep_once().await.unwrap(), 0);
    assert!(!app.sessions.get(user.session_id).unwrap().is_logged_in);
}
