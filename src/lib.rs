//! # Admin Dashboard Library
//!
//! Backend for a multi-tenant admin dashboard with:
//! - RESTful HTTP API for authentication and session management
//! - PostgreSQL for persistent storage
//! - A periodic sweep that logs out stale sessions
//! - A client-side active-time tracker that reconciles with the server on sign-out
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core entities and repository traits
//! - **Application Layer**: Business logic services, DTOs and the sweep job
//! - **Infrastructure Layer**: Database repositories and metrics
//! - **Presentation Layer**: HTTP handlers and middleware
//! - **Client**: Active-session tracker for dashboard clients
//!
//! ## Module Structure
//!
//! ```text
//! admin_dashboard/
//! +-- config/         Configuration management
//! +-- domain/         Domain entities and repository traits
//! +-- application/    Application services, DTOs, sweep job
//! +-- infrastructure/ Database and metrics implementations
//! +-- presentation/   HTTP routes and middleware
//! +-- client/         Active-time tracker, binder, sign-out flow
//! +-- shared/         Common utilities (errors, clock)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Client-side session activity tracking
pub mod client;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
