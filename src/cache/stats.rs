//! Cache Statistics Module
//!
//! Diagnostics snapshot of the cache: live keys plus hit/miss counters.

use serde::Serialize;

// == Cache Counters ==
/// Running counters kept by the cache between snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheCounters {
    /// Number of `get` calls that returned a value
    pub hits: u64,
    /// Number of `get` calls that found nothing or an expired entry
    pub misses: u64,
    /// Number of entries dropped because their TTL elapsed
    pub expired: u64,
}

impl CacheCounters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expired(&mut self, count: usize) {
        self.expired += count as u64;
    }
}

// == Cache Stats ==
/// Point-in-time view of the cache, for diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Current number of entries in the cache
    pub count: usize,
    /// Keys currently held, sorted
    pub keys: Vec<String>,
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    /// hits / (hits + misses), 0.0 before any lookup
    pub hit_rate: f64,
}

impl CacheStats {
    // == Constructor ==
    /// Builds a snapshot from the current keys and counters.
    pub fn new(mut keys: Vec<String>, counters: CacheCounters) -> Self {
        keys.sort();
        let total = counters.hits + counters.misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            counters.hits as f64 / total as f64
        };

        Self {
            count: keys.len(),
            keys,
            hits: counters.hits,
            misses: counters.misses,
            expired: counters.expired,
            hit_rate,
        }
    }
}
