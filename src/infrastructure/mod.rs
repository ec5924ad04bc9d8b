//! Infrastructure Layer
//!
//! Implementations of external concerns:
//! - PostgreSQL connection pool and migrations
//! - Repository implementations
//! - Prometheus metrics

pub mod database;
pub mod metrics;
pub mod repositories;
