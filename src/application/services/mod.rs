//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: Registration, login, token validation, sign-out
//! - **SessionService**: Session lookup, active-time reconciliation, listing
//! - **StaleSessionSweeper**: Periodic logout of idle sessions

pub mod auth_service;
pub mod session_service;
pub mod sweep_service;

// Re-export auth service types
pub use auth_service::{AuthError, AuthService, AuthServiceImpl, AuthTokens, AuthenticatedSession, Claims};

// Re-export session service types
pub use session_service::{SessionError, SessionService, SessionServiceImpl};

// Re-export sweep types
pub use sweep_service::StaleSessionSweeper;
