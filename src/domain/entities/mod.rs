//! # Domain Entities
//!
//! Core domain entities. All entities map directly to their database tables.
//!
//! - **User**: Dashboard account with credentials and role
//! - **Session**: Login session with last activity and reported active time
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod session;
mod user;

// Re-export User entity and related types
pub use user::{normalize_email, User, UserRepository, UserRole};

// Re-export Session entity and related types
pub use session::{Session, SessionRepository};

#[cfg(test)]
pub use session::MockSessionRepository;
#[cfg(test)]
pub use user::MockUserRepository;
