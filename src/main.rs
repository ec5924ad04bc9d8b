//! # Admin Dashboard
//!
//! Application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Database connection pool and migrations
//! - Stale-session sweep
//! - HTTP server

use anyhow::Result;
use tracing::info;

use admin_dashboard::config::Settings;
use admin_dashboard::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    admin_dashboard::telemetry::init_from_env();

    info!("Starting Admin Dashboard...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        stale_after_minutes = settings.sessions.stale_after_minutes,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
