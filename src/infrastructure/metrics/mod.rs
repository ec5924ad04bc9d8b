//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - Logins and sign-outs
//! - Active time reported by clients at reconciliation
//! - Stale-session sweep runs by outcome and sessions logged out by sweeps

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Successful logins (each creates a session)
pub static LOGINS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("logins_total", "Total number of successful logins").namespace("dashboard"),
    )
    .expect("Failed to create LOGINS_TOTAL metric")
});

/// Explicit sign-outs
pub static SIGN_OUTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("sign_outs_total", "Total number of explicit sign-outs").namespace("dashboard"),
    )
    .expect("Failed to create SIGN_OUTS_TOTAL metric")
});

/// Reconciliation calls accepted by the session-update endpoint
pub static ACTIVE_TIME_RECONCILIATIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new(
            "active_time_reconciliations_total",
            "Total number of accepted active-time reconciliations",
        )
        .namespace("dashboard"),
    )
    .expect("Failed to create ACTIVE_TIME_RECONCILIATIONS_TOTAL metric")
});

/// Sweep runs by outcome ("ok", "error")
pub static SWEEP_RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("session_sweep_runs_total", "Stale-session sweep runs").namespace("dashboard"),
        &["outcome"],
    )
    .expect("Failed to create SWEEP_RUNS_TOTAL metric")
});

/// Sessions logged out by the sweep
pub static SESSIONS_SWEPT_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new(
            "sessions_swept_total",
            "Total number of stale sessions logged out by the sweep",
        )
        .namespace("dashboard"),
    )
    .expect("Failed to create SESSIONS_SWEPT_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(LOGINS_TOTAL.clone()))
        .expect("Failed to register LOGINS_TOTAL");
    registry
        .register(Box::new(SIGN_OUTS_TOTAL.clone()))
        .expect("Failed to register SIGN_OUTS_TOTAL");
    registry
        .register(Box::new(ACTIVE_TIME_RECONCILIATIONS_TOTAL.clone()))
        .expect("Failed to register ACTIVE_TIME_RECONCILIATIONS_TOTAL");
    registry
        .register(Box::new(SWEEP_RUNS_TOTAL.clone()))
        .expect("Failed to register SWEEP_RUNS_TOTAL");
    registry
        .register(Box::new(SESSIONS_SWEPT_TOTAL.clone()))
        .expect("Failed to register SESSIONS_SWEPT_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record the outcome of one sweep run.
pub fn record_sweep(result: Result<u64, ()>) {
    match result {
        Ok(swept) => {
            SWEEP_RUNS_TOTAL.with_label_values(&["ok"]).inc();
            SESSIONS_SWEPT_TOTAL.inc_by(swept);
        }
        Err(()) => SWEEP_RUNS_TOTAL.with_label_values(&["error"]).inc(),
    }
}
