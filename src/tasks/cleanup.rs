//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries, so keys
//! nobody reads again do not hold memory indefinitely.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between cleanup runs. The write lock is held only for the scan itself.
///
/// # Arguments
/// * `cache` - shared reference to the cache
/// * `cleanup_interval_secs` - Interval in seconds between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = cache::shared::<PedigreeStatistics>(Duration::from_secs(300));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(cache: SharedCache<V>, cleanup_interval_secs: u64) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.cleanup()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tokio::sync::RwLock;

    use crate::cache::{ManualClock, TtlCache};

    fn manual_shared() -> (SharedCache<String>, ManualClock) {
        let clock = ManualClock::starting_at(1_700_000_000_000);
        let cache = TtlCache::with_clock(Duration::from_secs(300), Arc::new(clock.clone()));
        (Arc::new(RwLock::new(cache)), clock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_removes_expired_entries() {
        let (cache, clock) = manual_shared();

        cache
            .write()
            .await
            .set("expire_soon", "value".to_string(), Duration::from_secs(1));
        clock.advance(Duration::from_secs(5));

        let handle = spawn_cleanup_task(cache.clone(), 1);

        // Paused runtime: sleeping auto-advances tokio time past one interval
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(cache.read().await.len(), 0, "Expired entry should have been cleaned up");

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_preserves_valid_entries() {
        let (cache, _clock) = manual_shared();

        cache
            .write()
            .await
            .set("long_lived", "value".to_string(), Duration::from_secs(3600));

        let handle = spawn_cleanup_task(cache.clone(), 1);

        tokio::time::sleep(Duration::from_millis(2500)).await;

        let value = cache.write().await.get("long_lived");
        assert_eq!(value.as_deref(), Some("value"), "Valid entry should not be removed");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let (cache, _clock) = manual_shared();

        let handle = spawn_cleanup_task(cache, 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
