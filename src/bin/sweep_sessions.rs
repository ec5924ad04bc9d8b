//! One-shot stale-session sweep, for running from cron instead of the
//! in-process loop.

use std::sync::Arc;

use admin_dashboard::{
    application::services::StaleSessionSweeper,
    config::Settings,
    infrastructure::{database, repositories::PgSessionRepository},
    shared::clock::SystemClock,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    admin_dashboard::telemetry::init_from_env();

    let settings = Settings::load()?;
    let pool = database::create_pool(&settings.database).await?;

    let sweeper = StaleSessionSweeper::new(
        Arc::new(PgSessionRepository::new(pool)),
        Arc::new(SystemClock),
        settings.sessions.stale_after(),
    );

    let swept = sweeper.sweep_once().await?;
    tracing::info!(
        swept,
        stale_after_minutes = settings.sessions.stale_after_minutes,
        "Stale-session sweep finished"
    );

    Ok(())
}
