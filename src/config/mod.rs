//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use admin_dashboard::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("Stale sessions are swept after {} minutes", settings.sessions.stale_after_minutes);
//! ```

mod settings;

pub use settings::*;
