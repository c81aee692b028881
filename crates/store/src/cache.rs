//! Bounded LRU cache with a per-entry time-to-live.
//!
//! Expiry is measured from the last write of an entry; reads refresh LRU
//! recency but never extend the deadline. Expired entries are dropped
//! lazily on access or eagerly via [`TtlCache::purge_expired`].
//!
//! Deadlines use [`tokio::time::Instant`] so tests can drive expiry with a
//! paused clock.

use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

pub struct TtlCache<K: Hash + Eq, V> {
    entries: LruCache<K, Entry<V>>,
    ttl: Duration,
}

impl<K: Hash + Eq, V> TtlCache<K, V> {
    /// Create a cache holding at most `capacity` entries, each living for
    /// `ttl` after its last write.
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    /// Insert or overwrite `key`, restarting its expiry clock.
    ///
    /// Inserting a new key into a full cache evicts the least recently
    /// used entry.
    pub fn insert(&mut self, key: K, value: V) {
        let expires_at = Instant::now() + self.ttl;
        self.entries.put(key, Entry { value, expires_at });
    }

    /// Look up a live entry, dropping it first if it has expired.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let expired = self.entries.peek(key)?.is_expired(Instant::now());
        if expired {
            self.entries.pop(key);
            return None;
        }
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Hash + Eq + Clone, V> TtlCache<K, V> {
    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.pop(key);
        }
        expired.len()
    }
}
