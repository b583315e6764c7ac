//! Per-identifier mutual exclusion
//!
//! At most one install/import/remove chain runs per identifier inside this
//! process. Callers for the same identifier queue on the same async mutex and,
//! for imports, observe the finished install as a cache hit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

/// Guard held while an identifier's slot is being worked on
pub type SlotGuard = OwnedMutexGuard<()>;

/// Registry of per-identifier locks
#[derive(Debug, Default)]
pub struct SlotLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SlotLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `identifier`
    pub async fn acquire(&self, identifier: &str) -> SlotGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // Drop locks nobody holds or waits on
            locks.retain(|_, l| Arc::strong_count(l) > 1);
            locks
                .entry(identifier.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        if lock.try_lock().is_err() {
            debug!("Waiting for in-flight work on {}", identifier);
        }
        lock.lock_owned().await
    }
}
