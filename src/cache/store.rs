//! Cache Store Module
//!
//! TTL memoization cache: HashMap storage, lazy expiry on read, proactive
//! cleanup and regex-based invalidation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use tracing::debug;

use crate::cache::{CacheCounters, CacheEntry, CacheStats, Clock, SystemClock};
use crate::error::{AppError, Result};

// == TTL Cache ==
/// Process-local key/value memo with a per-entry time-to-live.
///
/// There is no capacity bound and no eviction beyond expiry. Callers that
/// share a cache across tasks wrap it in [`SharedCache`](crate::cache::SharedCache).
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Time source for stamping and expiry checks
    clock: Arc<dyn Clock>,
    /// TTL used by `set_default`
    default_ttl: Duration,
    counters: CacheCounters,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache on the system clock.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL applied by `set_default`
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
            default_ttl,
            counters: CacheCounters::default(),
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired.
    ///
    /// An expired entry is removed as a side effect.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();

        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(now),
            None => {
                self.counters.record_miss();
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.counters.record_miss();
            self.counters.record_expired(1);
            debug!("Cache expired for key: {}", key);
            return None;
        }

        self.counters.record_hit();
        debug!("Cache hit for key: {}", key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any existing entry and
    /// restarting its TTL.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl);
        debug!("Cache set for key: {}, TTL: {}s", key, ttl.as_secs());
        self.entries.insert(key, entry);
    }

    /// Stores `value` under `key` with the cache's default TTL.
    pub fn set_default(&mut self, key: impl Into<String>, value: V) {
        let ttl = self.default_ttl;
        self.set(key, value, ttl);
    }

    // == Delete ==
    /// Removes the entry for `key`. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let deleted = self.entries.remove(key).is_some();
        if deleted {
            debug!("Cache deleted for key: {}", key);
        }
        deleted
    }

    // == Delete Pattern ==
    /// Removes every entry whose key matches the regular expression `pattern`.
    ///
    /// Returns the number of entries removed; zero matches is not an error.
    /// Fails only if `pattern` does not compile, in which case nothing is removed.
    pub fn delete_pattern(&mut self, pattern: &str) -> Result<usize> {
        let regex = Regex::new(pattern)
            .map_err(|e| AppError::InvalidPattern(format!("'{}': {}", pattern, e)))?;

        let before = self.entries.len();
        self.entries.retain(|key, _| !regex.is_match(key));
        let removed = before - self.entries.len();

        debug!(
            "Deleted {} cache entries matching pattern: {}",
            removed, pattern
        );
        Ok(removed)
    }

    // == Clear ==
    /// Removes all entries regardless of TTL. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let size = self.entries.len();
        self.entries.clear();
        debug!("Cleared {} cache entries", size);
        size
    }

    // == Cleanup ==
    /// Removes every entry whose age exceeds its TTL.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - self.entries.len();

        self.counters.record_expired(removed);
        if removed > 0 {
            debug!("Cleaned up {} expired cache entries", removed);
        }
        removed
    }

    // == Stats ==
    /// Returns the entry count, keys and lookup counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats::new(self.entries.keys().cloned().collect(), self.counters)
    }

    /// TTL applied by `set_default`.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included until
    /// they are touched or cleaned up.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
