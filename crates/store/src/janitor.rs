//! Background purge of expired status records.
//!
//! Expired records are otherwise only dropped when touched or evicted by
//! LRU pressure. The janitor sweeps every watched store on a fixed
//! interval so abandoned jobs release their memory.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::result_store::ResultStore;

/// Default interval between sweeps.
pub const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(30);

pub struct StoreJanitor {
    stores: Vec<(&'static str, Arc<ResultStore>)>,
    interval: Duration,
}

impl StoreJanitor {
    pub fn new(interval: Duration) -> Self {
        Self {
            stores: Vec::new(),
            interval,
        }
    }

    /// Add a store to the sweep list under a name used in log output.
    pub fn watch(mut self, name: &'static str, store: Arc<ResultStore>) -> Self {
        self.stores.push((name, store));
        self
    }

    /// Purge every watched store once. Returns the total removed.
    pub fn sweep(&self) -> usize {
        let mut total = 0;
        for (name, store) in &self.stores {
            let removed = store.purge_expired();
            if removed > 0 {
                tracing::debug!(store = *name, removed, "Purged expired status records");
            }
            total += removed;
        }
        total
    }

    /// Sweep on every tick until the cancellation token is triggered.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            stores = self.stores.len(),
            "Store janitor started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Store janitor shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.sweep();
                }
            }
        }
    }
}

impl Default for StoreJanitor {
    fn default() -> Self {
        Self::new(DEFAULT_PURGE_INTERVAL)
    }
}
