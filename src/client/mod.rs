//! Client-side session activity tracking.
//!
//! Counts the milliseconds a signed-in user spends with the dashboard
//! visible and focused, keeps the running total in durable key-value
//! storage so it survives reloads, and hands it to the server when the
//! user signs out.
//!
//! The pieces, leaves first:
//! - [`ActivitySampler`]: is the page visible and focused right now?
//! - [`ActiveTimeAccumulator`]: the persisted running total.
//! - [`SessionBinder`]: which server session the total belongs to.
//! - [`TrackerRuntime`]: polls the session lookup and drives the 1 s ticker.
//! - [`SignOutFlow`]: reconcile, sign out, clear, navigate.

pub mod accumulator;
pub mod activity;
pub mod binder;
pub mod sign_out;
pub mod storage;
pub mod tracker;
pub mod transport;

pub use accumulator::{ActiveTimeAccumulator, ACTIVE_TIME_STORAGE_KEY, TICK_INCREMENT_MS};
pub use activity::{ActivitySampler, PageActivity, Visibility};
pub use binder::{BindingState, BindingTransition, SessionBinder};
pub use sign_out::{Navigator, SignOutFlow, SignOutOutcome};
pub use storage::{KeyValueStorage, MemoryStorage, StorageError};
pub use tracker::{ActiveTimeState, SessionActivityTracker, SharedTracker, TrackerConfig, TrackerRuntime};
pub use transport::{HttpSessionTransport, SessionSummary, SessionTransport, SessionUpdate, TransportError};
