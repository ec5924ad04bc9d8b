//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! - **PgUserRepository** - Dashboard accounts
//! - **PgSessionRepository** - Login sessions, reconciliation and sweeps
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use admin_dashboard::infrastructure::repositories::{PgSessionRepository, PgUserRepository};
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let user_repo = PgUserRepository::new(pool.clone());
//!     let session_repo = PgSessionRepository::new(pool);
//! }
//! ```

pub mod session_repository;
pub mod user_repository;

pub use session_repository::PgSessionRepository;
pub use user_repository::PgUserRepository;
