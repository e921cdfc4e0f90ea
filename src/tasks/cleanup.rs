//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.
//!
//! Reads never depend on this task: expired entries are already invisible.
//! It only reclaims memory held by keys nobody reads again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCache;
use crate::config::Config;

/// Spawns a background task that periodically purges expired cache entries.
///
/// # Arguments
/// * `cache` - shared reference to the cache
/// * `cleanup_interval_secs` - Interval in seconds between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(MemoryCache::new());
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: Arc<MemoryCache>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            // The exclusive section is a single retain over the map
            let removed = cache.purge_expired();

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

/// Spawns the cleanup task when `config.cleanup_interval` is non-zero.
pub fn spawn_configured_cleanup(
    cache: Arc<MemoryCache>,
    config: &Config,
) -> Option<JoinHandle<()>> {
    if config.cleanup_interval == 0 {
        debug!("TTL cleanup disabled, relying on lazy expiry");
        return None;
    }

    Some(spawn_cleanup_task(cache, config.cleanup_interval))
}
