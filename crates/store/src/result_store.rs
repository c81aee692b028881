//! Shared job status store.
//!
//! All operations take a short synchronous lock and never await, so they
//! can be called from any task without becoming suspension points.

use std::num::NonZeroUsize;
use std::time::Duration;

use chartflow_core::status::StatusRecord;
use chartflow_core::types::JobId;
use parking_lot::Mutex;

use crate::cache::TtlCache;

/// Default maximum number of tracked jobs.
pub const DEFAULT_MAX_ENTRIES: usize = 1_000_000;
/// Default lifetime of a record after its last write.
pub const DEFAULT_TTL: Duration = Duration::from_secs(120);

/// Capacity and expiry settings, fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct StoreConfig {
    pub max_entries: NonZeroUsize,
    pub ttl: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_entries: NonZeroUsize::new(DEFAULT_MAX_ENTRIES).unwrap_or(NonZeroUsize::MIN),
            ttl: DEFAULT_TTL,
        }
    }
}

/// Outcome of a guarded write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The record was written.
    Applied,
    /// The job was already stopped; nothing was written.
    Stopped,
    /// No record exists (expired, evicted, or never accepted); nothing was
    /// written.
    Gone,
}

/// Job id to [`StatusRecord`] map with TTL expiry and LRU eviction.
pub struct ResultStore {
    records: Mutex<TtlCache<JobId, StatusRecord>>,
}

impl ResultStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            records: Mutex::new(TtlCache::new(config.max_entries, config.ttl)),
        }
    }

    /// Unconditionally overwrite the record for `id`.
    pub fn put(&self, id: &JobId, record: StatusRecord) {
        self.records.lock().insert(id.clone(), record);
    }

    /// Current record for `id`, or `None` if unknown, expired, or evicted.
    pub fn get(&self, id: &JobId) -> Option<StatusRecord> {
        self.records.lock().get(id).cloned()
    }

    pub fn is_stopped(&self, id: &JobId) -> bool {
        self.records
            .lock()
            .get(id)
            .is_some_and(StatusRecord::is_stopped)
    }

    /// Overwrite the live record for `id` unless it is `stopped`.
    ///
    /// Only updates an existing record: a job whose record expired or was
    /// evicted is abandoned, since a `stopped` marker may have been lost
    /// with it. The check and the write happen under one lock acquisition,
    /// so a concurrent cancel either lands before (and wins) or after (and
    /// overwrites) this write.
    pub fn put_unless_stopped(&self, id: &JobId, record: StatusRecord) -> Transition {
        let mut records = self.records.lock();
        match records.get(id) {
            None => return Transition::Gone,
            Some(current) if current.is_stopped() => return Transition::Stopped,
            Some(_) => {}
        }
        records.insert(id.clone(), record);
        Transition::Applied
    }

    /// Drop all expired records. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.records.lock().purge_expired()
    }

    /// Number of stored records, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
