//! Cache Module
//!
//! Provides in-process memoization with TTL expiration, used to avoid
//! recomputing aggregate reports on every request.

mod clock;
mod entry;
mod stats;
mod store;


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use stats::{CacheCounters, CacheStats};
pub use store::TtlCache;

/// A cache shared between request handlers and the cleanup task.
pub type SharedCache<V> = Arc<RwLock<TtlCache<V>>>;

/// Wraps a fresh cache for sharing.
pub fn shared<V: Clone>(default_ttl: Duration) -> SharedCache<V> {
    Arc::new(RwLock::new(TtlCache::new(default_ttl)))
}
