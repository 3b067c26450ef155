use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use log::debug;

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Key/value cache with one TTL for every entry.
///
/// Expiry is lazy: a stale entry is evicted by the `get` that finds it.
/// All access goes through one mutex, so concurrent readers and writers
/// never see half-updated bookkeeping.
pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_at(key, value, Instant::now());
    }

    /// Drop one entry, or everything when `key` is `None`.
    pub fn clear(&self, key: Option<&str>) {
        let mut entries = self.lock();
        match key {
            Some(key) => {
                entries.remove(key);
            }
            None => entries.clear(),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub(crate) fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.lock();
        let entry = entries.get(key)?;

        if now.saturating_duration_since(entry.stored_at) < self.ttl {
            debug!("cache hit: {key}");
            return Some(entry.value.clone());
        }

        debug!("cache entry expired: {key}");
        entries.remove(key);
        None
    }

    pub(crate) fn set_at(&self, key: impl Into<String>, value: V, now: Instant) {
        self.lock().insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: now,
            },
        );
    }

    // A panic while holding the lock cannot leave an entry half-written.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
