//! Health Check and Metrics API Tests

use serde_json::Value;

use crate::common::TestApp;

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new();

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body.get("version").is_some());
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new();

    let response = app.server.get("/health/live").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "alive");
}

#[tokio::test]
async fn test_readiness_reports_store_and_sweep() {
    let app = TestApp::new();

    let response = app.server.get("/health/ready").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["checks"]["database"]["status"], "healthy");
    assert_eq!(body["checks"]["session_sweep"]["stale_after_minutes"], 240);
    assert_eq!(body["checks"]["session_sweep"]["interval_secs"], 900);
}

#[tokio::test]
async fn test_metrics_exposes_session_counters() {
    let app = TestApp::new();
    app.register_user().await;

    let response = app.server.get("/metrics").await;

    response.assert_status_ok();
    assert!(response.text().contains("dashboard_logins_total"));
}
