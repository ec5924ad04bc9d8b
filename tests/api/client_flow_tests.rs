//! The client tracker talking HTTP to a live server

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::net::TcpListener;

use admin_dashboard::client::{
    BindingTransition, HttpSessionTransport, KeyValueStorage, MemoryStorage, Navigator,
    PageActivity, SessionActivityTracker, SessionTransport, SignOutFlow, SignOutOutcome,
    TrackerConfig, TrackerRuntime, Visibility, ACTIVE_TIME_STORAGE_KEY,
};
use admin_dashboard::application::services::AuthService;
use admin_dashboard::shared::clock::ManualClock;
use admin_dashboard::startup::build_router;

use crate::common::TestApp;

#[derive(Default)]
struct CountingNavigator {
    visits: AtomicUsize,
}

impl Navigator for CountingNavigator {
    fn to_login(&self) {
        self.visits.fetch_add(1, Ordering::SeqCst);
    }
}

/// Ticks are driven by hand; the runtime's own ticker never fires.
fn manual_ticks() -> TrackerConfig {
    TrackerConfig {
        tick_interval: Duration::from_secs(3600),
        ..TrackerConfig::default()
    }
}

/// Serve the test app's router on an ephemeral port.
async fn serve(app: &TestApp) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = build_router(app.state.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_tracked_time_reaches_server_on_sign_out() {
    let app = TestApp::new();
    let user = app.register_user().await;
    let base_url = serve(&app).await;

    let transport = Arc::new(HttpSessionTransport::new(base_url).with_access_token(&user.token));
    let storage = Arc::new(MemoryStorage::new());
    let page = Arc::new(PageActivity::new());
    let tracker = SessionActivityTracker::new(
        storage.clone(),
        page.clone(),
        Arc::new(ManualClock::new(Utc::now())),
    )
    .into_shared();
    let runtime = Arc::new(TrackerRuntime::new(
        tracker.clone(),
        transport.clone(),
        manual_ticks(),
    ));

    assert_eq!(
        runtime.poll_once().await,
        BindingTransition::Bound(user.session_id.to_string())
    );

    // Drive ticks by hand: four active, one hidden
    {
        let mut tracker = tracker.lock();
        for _ in 0..4 {
            tracker.tick();
        }
        page.set_visibility(Visibility::Hidden);
        tracker.tick();
    }
    assert_eq!(
        storage.get(ACTIVE_TIME_STORAGE_KEY).unwrap().as_deref(),
        Some("4000")
    );

    let navigator = Arc::new(CountingNavigator::default());
    let flow = SignOutFlow::new(runtime.clone(), navigator.clone());
    let outcome = flow.run().await;

    assert_eq!(
        outcome,
        SignOutOutcome {
            reconciled: true,
            signed_out: true
        }
    );
    assert_eq!(navigator.visits.load(Ordering::SeqCst), 1);
    assert!(!storage.contains(ACTIVE_TIME_STORAGE_KEY));
    assert!(!runtime.is_ticking());

    let session = app.sessions.get(user.session_id).unwrap();
    assert_eq!(session.total_active_time_ms, 4000);
    assert!(!session.is_logged_in);

    // Without a token the lookup is anonymous and finds nothing
    assert!(transport.fetch_session().await.unwrap().is_none());
}

#[tokio::test]
async fn test_server_side_logout_resets_client_total() {
    let app = TestApp::new();
    let user = app.register_user().await;
    let base_url = serve(&app).await;

    let transport = Arc::new(HttpSessionTransport::new(base_url).with_access_token(&user.token));
    let storage = Arc::new(MemoryStorage::new());
    let tracker = SessionActivityTracker::new(
        storage.clone(),
        Arc::new(PageActivity::new()),
        Arc::new(ManualClock::new(Utc::now())),
    )
    .into_shared();
    let runtime = TrackerRuntime::new(tracker.clone(), transport, manual_ticks());

    runtime.poll_once().await;
    tracker.lock().tick();
    assert!(storage.contains(ACTIVE_TIME_STORAGE_KEY));

    // Session ends elsewhere (another tab, or the sweep)
    app.state
        .auth_service()
        .sign_out(user.session_id)
        .await
        .unwrap();

    assert_eq!(runtime.poll_once().await, BindingTransition::LoggedOut);
    assert!(!runtime.is_ticking());
    assert_eq!(tracker.lock().snapshot().total_active_time_ms, 0);
    assert!(!storage.contains(ACTIVE_TIME_STORAGE_KEY));
}
