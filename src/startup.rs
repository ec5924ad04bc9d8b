//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;

use crate::application::services::{AuthServiceImpl, SessionServiceImpl, StaleSessionSweeper};
use crate::config::Settings;
use crate::domain::{SessionRepository, UserRepository};
use crate::infrastructure::database;
use crate::infrastructure::repositories::{PgSessionRepository, PgUserRepository};
use crate::presentation::http::{handlers::health, routes};
use crate::presentation::middleware::{cors, logging};
use crate::shared::clock::{Clock, SystemClock};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub clock: Arc<dyn Clock>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        clock: Arc<dyn Clock>,
        settings: Settings,
    ) -> Self {
        Self {
            users,
            sessions,
            clock,
            settings: Arc::new(settings),
        }
    }

    pub fn auth_service(&self) -> AuthServiceImpl<dyn UserRepository, dyn SessionRepository> {
        AuthServiceImpl::new(
            self.users.clone(),
            self.sessions.clone(),
            self.clock.clone(),
            self.settings.jwt.clone(),
        )
    }

    pub fn session_service(&self) -> SessionServiceImpl<dyn SessionRepository> {
        SessionServiceImpl::new(self.sessions.clone(), self.clock.clone())
    }

    /// Sweeper over this state's session store and clock
    pub fn sweeper(&self) -> StaleSessionSweeper<dyn SessionRepository> {
        StaleSessionSweeper::new(
            self.sessions.clone(),
            self.clock.clone(),
            self.settings.sessions.stale_after(),
        )
    }
}

/// Build the full router (routes, tracing, CORS) for a state
pub fn build_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(logging::create_trace_layer())
        .layer(cors::create_cors_layer(&state.settings.cors));

    routes::create_router(state).layer(middleware)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
    sweeper: Option<JoinHandle<()>>,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        health::init_server_start();

        let db = database::create_pool(&settings.database).await?;
        tracing::info!("Database connection pool created");

        if settings.database.run_migrations {
            database::run_migrations(&db).await?;
            tracing::info!("Database migrations applied");
        }

        let state = AppState::new(
            Arc::new(PgUserRepository::new(db.clone())),
            Arc::new(PgSessionRepository::new(db)),
            Arc::new(SystemClock),
            settings,
        );

        Self::from_state(state).await
    }

    /// Bind the listener for a prepared state, then start the sweep.
    pub async fn from_state(state: AppState) -> Result<Self> {
        let addr = state.settings.server_addr();
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Listening on {}", addr);

        let sweeper = if state.settings.sessions.sweep_enabled {
            Some(state.sweeper().spawn(state.settings.sessions.sweep_interval()))
        } else {
            tracing::warn!("Stale-session sweep disabled");
            None
        };

        Ok(Self {
            listener,
            router: build_router(state),
            sweeper,
        })
    }

    /// Run the server until stopped (Ctrl+C)
    pub async fn run_until_stopped(self) -> Result<()> {
        let result = axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        if let Some(sweeper) = self.sweeper {
            sweeper.abort();
        }

        result?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
