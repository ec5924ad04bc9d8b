//! Persisted running total of active milliseconds.

use std::sync::Arc;

use super::storage::KeyValueStorage;

/// Storage key holding the total as a decimal string of milliseconds.
pub const ACTIVE_TIME_STORAGE_KEY: &str = "totalActiveTime";

/// Added per active tick.
pub const TICK_INCREMENT_MS: u64 = 1000;

pub struct ActiveTimeAccumulator {
    storage: Arc<dyn KeyValueStorage>,
    total_ms: u64,
}

impl ActiveTimeAccumulator {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            total_ms: 0,
        }
    }

    /// Load the total left by a previous page load. Missing or unreadable
    /// values start from zero.
    pub fn restore(&mut self) -> u64 {
        self.total_ms = match self.storage.get(ACTIVE_TIME_STORAGE_KEY) {
            Ok(Some(raw)) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Ignoring unparsable stored active time");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored active time");
                0
            }
        };
        self.total_ms
    }

    /// One tick of the 1 s cadence. Inactive ticks change nothing.
    /// Returns whether the total grew.
    pub fn tick(&mut self, active: bool) -> bool {
        if !active {
            return false;
        }

        self.total_ms = self.total_ms.saturating_add(TICK_INCREMENT_MS);
        if let Err(e) = self
            .storage
            .set(ACTIVE_TIME_STORAGE_KEY, &self.total_ms.to_string())
        {
            tracing::warn!(error = %e, total_ms = self.total_ms, "Could not persist active time");
        }
        true
    }

    /// Zero the total and drop the persisted value.
    pub fn reset(&mut self) {
        self.total_ms = 0;
        if let Err(e) = self.storage.remove(ACTIVE_TIME_STORAGE_KEY) {
            tracing::warn!(error = %e, "Could not clear stored active time");
        }
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }
}
