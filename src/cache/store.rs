//! Cache Store Module
//!
//! In-memory `Cache` backend: a HashMap behind one reader/writer lock with
//! lazy TTL expiry.
//!
//! Expired entries are removed by whichever access observes them. A reader
//! that finds an expired entry under the shared lock drops it, takes the
//! exclusive lock and checks the entry again before removing it, so a value
//! written in between is never evicted.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::cache::stats::StatsRecorder;
use crate::cache::{Cache, CacheEntry, CacheStats, NO_EXPIRY};
use crate::error::{CacheError, Result};
use crate::models::{Caster, Value};

type Entries = HashMap<String, CacheEntry>;

// == Memory Cache ==
/// Thread-safe in-memory cache with TTL support.
#[derive(Debug, Default)]
pub struct MemoryCache {
    /// Key-value storage
    entries: RwLock<Entries>,
    /// Lookup statistics
    stats: StatsRecorder,
}

impl MemoryCache {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Length ==
    /// Returns the number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .values()
            .filter(|entry| !entry.is_expired())
            .count()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.read().len())
    }

    // == Purge Expired ==
    /// Removes all expired entries from the map.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        let removed = before - entries.len();

        self.stats.record_expirations(removed);
        removed
    }

    // == Read ==
    /// Applies `f` to the live entry under `key`.
    ///
    /// Runs under the shared lock; escalates to the exclusive lock only when
    /// the entry is found expired.
    fn read<T>(&self, key: &str, f: impl Fn(&CacheEntry) -> T) -> Option<T> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired() => return Some(f(entry)),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write();
        self.live_entry_mut(&mut entries, key).map(|entry| f(&*entry))
    }

    /// Returns the live entry under `key`, removing it first if expired.
    /// Callers hold the exclusive lock.
    fn live_entry_mut<'a>(
        &self,
        entries: &'a mut Entries,
        key: &str,
    ) -> Option<&'a mut CacheEntry> {
        if entries.get(key).is_some_and(CacheEntry::is_expired) {
            entries.remove(key);
            self.stats.record_expirations(1);
            debug!(key, "Removed expired entry");
        }

        entries.get_mut(key)
    }

    // == Numeric Mutation ==
    /// Replaces the value under `key` with `op` applied to it, keeping the
    /// entry's expiry. Read and write happen under one exclusive section.
    /// When `op` yields None the entry is left untouched.
    fn modify<N>(
        &self,
        key: &str,
        coerce: impl Fn(&Value) -> Option<N>,
        op: impl FnOnce(N) -> Option<Value>,
    ) -> Result<bool> {
        if self.read(key, |_| ()).is_none() {
            return Ok(false);
        }

        let mut entries = self.entries.write();
        let Some(entry) = self.live_entry_mut(&mut entries, key) else {
            return Ok(false);
        };

        match coerce(&entry.value).and_then(op) {
            Some(updated) => {
                entry.value = updated;
                Ok(true)
            }
            None => {
                warn!(key, stored = entry.value.type_name(), "Value is not numeric");
                Err(CacheError::not_numeric(key))
            }
        }
    }
}

impl Cache for MemoryCache {
    // == Put ==
    fn put(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), CacheEntry::new(value, ttl));
        Ok(())
    }

    // == Update ==
    fn update(&self, key: &str, value: Value) -> Result<bool> {
        if self.read(key, |_| ()).is_none() {
            return Ok(false);
        }

        let mut entries = self.entries.write();
        match self.live_entry_mut(&mut entries, key) {
            Some(entry) => {
                entry.value = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // == Put Or Update ==
    fn put_or_update(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<()> {
        let mut entries = self.entries.write();
        match self.live_entry_mut(&mut entries, key) {
            Some(entry) => entry.value = value,
            None => {
                entries.insert(key.to_string(), CacheEntry::new(value, ttl));
            }
        }
        Ok(())
    }

    // == Get ==
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let value = self.read(key, |entry| entry.value.clone());
        self.stats.record_lookup(value.is_some());
        Ok(value)
    }

    // == Pull ==
    fn pull(&self, key: &str) -> Result<Option<Value>> {
        let mut entries = self.entries.write();
        let live = self.live_entry_mut(&mut entries, key).is_some();
        let value = if live {
            entries.remove(key).map(|entry| entry.value)
        } else {
            None
        };

        self.stats.record_lookup(value.is_some());
        Ok(value)
    }

    // == Cast ==
    fn cast(&self, key: &str) -> Result<Caster> {
        self.get(key).map(Caster::new)
    }

    // == Exists ==
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.read(key, |_| ()).is_some())
    }

    // == Forget ==
    fn forget(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    // == TTL ==
    fn ttl(&self, key: &str) -> Result<Duration> {
        Ok(match self.read(key, CacheEntry::ttl_remaining) {
            None => Duration::ZERO,
            Some(None) => NO_EXPIRY,
            Some(Some(remaining)) => remaining,
        })
    }

    // == Increment / Decrement ==
    fn increment(&self, key: &str, delta: i64) -> Result<bool> {
        self.modify(key, Value::coerce_i64, |n| Some(Value::Int(n.saturating_add(delta))))
    }

    fn decrement(&self, key: &str, delta: i64) -> Result<bool> {
        self.modify(key, Value::coerce_i64, |n| Some(Value::Int(n.saturating_sub(delta))))
    }

    fn increment_float(&self, key: &str, delta: f64) -> Result<bool> {
        self.modify(key, Value::coerce_f64, |n| finite_float(n + delta))
    }

    fn decrement_float(&self, key: &str, delta: f64) -> Result<bool> {
        self.modify(key, Value::coerce_f64, |n| finite_float(n - delta))
    }
}

/// Float results must stay readable by `coerce_f64`.
fn finite_float(n: f64) -> Option<Value> {
    n.is_finite().then_some(Value::Float(n))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread::{self, sleep};

    const SHORT: Duration = Duration::from_millis(50);
    const PAST_SHORT: Duration = Duration::from_millis(80);

    #[test]
    fn test_store_new() {
        let store = MemoryCache::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_and_get() {
        let store = MemoryCache::new();

        store.put("key1", Value::from("value1"), None).unwrap();

        assert_eq!(store.get("key1").unwrap(), Some(Value::from("value1")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_missing_is_not_an_error() {
        let store = MemoryCache::new();
        assert_eq!(store.get("nonexistent").unwrap(), None);
        assert!(!store.exists("nonexistent").unwrap());
    }

    #[test]
    fn test_put_overwrites_value_and_ttl() {
        let store = MemoryCache::new();

        store.put("key1", Value::from("value1"), Some(SHORT)).unwrap();
        store.put("key1", Value::from("value2"), None).unwrap();

        assert_eq!(store.get("key1").unwrap(), Some(Value::from("value2")));
        assert_eq!(store.ttl("key1").unwrap(), NO_EXPIRY);
    }

    #[test]
    fn test_ttl_expiration() {
        let store = MemoryCache::new();

        store.put("key1", Value::from("value1"), Some(SHORT)).unwrap();
        assert!(store.exists("key1").unwrap());

        sleep(PAST_SHORT);

        assert_eq!(store.get("key1").unwrap(), None);
        assert!(!store.exists("key1").unwrap());
        assert_eq!(store.ttl("key1").unwrap(), Duration::ZERO);
        assert_eq!(store.stats().total_entries, 0, "Expired entry should be removed on read");
    }

    #[test]
    fn test_update_preserves_ttl() {
        let store = MemoryCache::new();
        store.put("key", Value::Int(1), Some(Duration::from_secs(10))).unwrap();
        let before = store.ttl("key").unwrap();

        assert!(store.update("key", Value::Int(2)).unwrap());

        let after = store.ttl("key").unwrap();
        assert_eq!(store.get("key").unwrap(), Some(Value::Int(2)));
        assert!(after <= before);
        assert!(before - after < Duration::from_millis(500));
    }

    #[test]
    fn test_update_missing_key_does_not_write() {
        let store = MemoryCache::new();

        assert!(!store.update("key", Value::Int(2)).unwrap());
        assert!(!store.exists("key").unwrap());
    }

    #[test]
    fn test_update_expired_key_does_not_write() {
        let store = MemoryCache::new();
        store.put("key", Value::Int(1), Some(SHORT)).unwrap();

        sleep(PAST_SHORT);

        assert!(!store.update("key", Value::Int(2)).unwrap());
        assert!(!store.exists("key").unwrap());
    }

    #[test]
    fn test_put_or_update() {
        let store = MemoryCache::new();

        store
            .put_or_update("key", Value::from("a"), Some(Duration::from_secs(10)))
            .unwrap();
        let ttl = store.ttl("key").unwrap();
        assert!(ttl <= Duration::from_secs(10) && ttl > Duration::from_secs(9));

        // Existing key keeps its TTL even when a different one is supplied
        store.put_or_update("key", Value::from("b"), None).unwrap();
        assert_eq!(store.get("key").unwrap(), Some(Value::from("b")));
        assert!(store.ttl("key").unwrap() <= Duration::from_secs(10));
    }

    #[test]
    fn test_pull_removes_entry() {
        let store = MemoryCache::new();
        store.put("key", Value::from("v"), None).unwrap();

        assert_eq!(store.pull("key").unwrap(), Some(Value::from("v")));
        assert_eq!(store.pull("key").unwrap(), None);
        assert!(!store.exists("key").unwrap());
    }

    #[test]
    fn test_cast() {
        let store = MemoryCache::new();
        store.put("num", Value::from("12"), None).unwrap();

        assert_eq!(store.cast("num").unwrap().to_i64(), Ok(12));
        assert!(store.cast("missing").unwrap().is_nil());
    }

    #[test]
    fn test_forget_is_idempotent() {
        let store = MemoryCache::new();
        store.put("key", Value::Int(1), None).unwrap();

        store.forget("key").unwrap();
        store.forget("key").unwrap();

        assert!(!store.exists("key").unwrap());
    }

    #[test]
    fn test_ttl_without_expiry_is_sentinel() {
        let store = MemoryCache::new();
        store.put("key", Value::Int(1), None).unwrap();

        assert_eq!(store.ttl("key").unwrap(), NO_EXPIRY);
        assert_eq!(store.ttl("missing").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_increment_and_decrement() {
        let store = MemoryCache::new();
        store.put("counter", Value::Int(10), None).unwrap();

        assert!(store.increment("counter", 5).unwrap());
        assert_eq!(store.get("counter").unwrap(), Some(Value::Int(15)));

        assert!(store.decrement("counter", 3).unwrap());
        assert_eq!(store.get("counter").unwrap(), Some(Value::Int(12)));
    }

    #[test]
    fn test_increment_missing_key() {
        let store = MemoryCache::new();

        assert!(!store.increment("counter", 1).unwrap());
        assert!(!store.exists("counter").unwrap());
    }

    #[test]
    fn test_increment_preserves_ttl() {
        let store = MemoryCache::new();
        store.put("counter", Value::Int(1), Some(SHORT)).unwrap();

        assert!(store.increment("counter", 1).unwrap());
        assert!(store.ttl("counter").unwrap() <= SHORT);

        sleep(PAST_SHORT);

        assert!(!store.increment("counter", 1).unwrap());
    }

    #[test]
    fn test_increment_coerces_stored_text() {
        let store = MemoryCache::new();
        store.put("counter", Value::from("7"), None).unwrap();

        assert!(store.increment("counter", 1).unwrap());
        assert_eq!(store.get("counter").unwrap(), Some(Value::Int(8)));
    }

    #[test]
    fn test_float_increment_and_decrement() {
        let store = MemoryCache::new();
        store.put("counter", Value::Float(10.5), None).unwrap();

        assert!(store.increment_float("counter", 5.0).unwrap());
        assert_eq!(store.get("counter").unwrap(), Some(Value::Float(15.5)));

        assert!(store.decrement_float("counter", 3.0).unwrap());
        assert_eq!(store.get("counter").unwrap(), Some(Value::Float(12.5)));
    }

    #[test]
    fn test_float_overflow_is_rejected_without_writing() {
        let store = MemoryCache::new();
        store.put("counter", Value::Float(f64::MAX), None).unwrap();

        assert_eq!(
            store.increment_float("counter", f64::MAX),
            Err(CacheError::not_numeric("counter"))
        );
        assert_eq!(store.get("counter").unwrap(), Some(Value::Float(f64::MAX)));

        // The counter is still usable afterwards
        assert!(store.decrement_float("counter", f64::MAX).unwrap());
        assert_eq!(store.cast("counter").unwrap().to_f64(), Ok(0.0));
    }

    #[test]
    fn test_float_nan_delta_is_rejected() {
        let store = MemoryCache::new();
        store.put("counter", Value::Float(1.0), None).unwrap();

        assert!(store.increment_float("counter", f64::NAN).is_err());
        assert_eq!(store.get("counter").unwrap(), Some(Value::Float(1.0)));
    }

    #[test]
    fn test_float_increment_normalizes_integer() {
        let store = MemoryCache::new();
        store.put("counter", Value::Int(2), None).unwrap();

        assert!(store.increment_float("counter", 0.5).unwrap());
        assert_eq!(store.get("counter").unwrap(), Some(Value::Float(2.5)));
    }

    #[test]
    fn test_increment_not_numeric() {
        let store = MemoryCache::new();
        store.put("key", Value::from("not-a-number"), None).unwrap();

        assert_eq!(
            store.increment("key", 1),
            Err(CacheError::not_numeric("key"))
        );
        assert!(store.decrement_float("key", 1.0).is_err());
        assert_eq!(store.get("key").unwrap(), Some(Value::from("not-a-number")));
    }

    #[test]
    fn test_decrement_saturates() {
        let store = MemoryCache::new();
        store.put("counter", Value::Int(i64::MIN + 1), None).unwrap();

        assert!(store.decrement("counter", 5).unwrap());
        assert_eq!(store.get("counter").unwrap(), Some(Value::Int(i64::MIN)));
    }

    #[test]
    fn test_purge_expired() {
        let store = MemoryCache::new();
        store.put("key1", Value::Int(1), Some(SHORT)).unwrap();
        store.put("key2", Value::Int(2), Some(Duration::from_secs(10))).unwrap();

        sleep(PAST_SHORT);

        assert_eq!(store.len(), 1);
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.stats().total_entries, 1);
        assert!(store.exists("key2").unwrap());
    }

    #[test]
    fn test_stats() {
        let store = MemoryCache::new();

        store.put("key1", Value::from("value1"), None).unwrap();
        store.get("key1").unwrap();
        store.get("nonexistent").unwrap();

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(MemoryCache::new());
        store.put("counter", Value::Int(0), None).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..50 {
                        store.increment("counter", 1).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get("counter").unwrap(), Some(Value::Int(400)));
    }

    #[test]
    fn test_recheck_keeps_entry_replaced_after_expiry() {
        let store = MemoryCache::new();
        store.put("key", Value::Int(1), Some(Duration::from_millis(1))).unwrap();
        sleep(Duration::from_millis(5));

        // A reader saw the expired entry under the shared lock; before it
        // gets the exclusive lock a writer stores a fresh value
        let mut entries = store.entries.write();
        assert!(entries.get("key").unwrap().is_expired());
        entries.insert("key".to_string(), CacheEntry::new(Value::Int(2), None));

        let live = store.live_entry_mut(&mut entries, "key").map(|entry| entry.value.clone());
        drop(entries);

        assert_eq!(live, Some(Value::Int(2)));
        assert_eq!(store.get("key").unwrap(), Some(Value::Int(2)));
        assert_eq!(store.stats().expirations, 0);
    }

    #[test]
    fn test_recheck_removes_entry_still_expired() {
        let store = MemoryCache::new();
        store.put("key", Value::Int(1), Some(Duration::from_millis(1))).unwrap();
        sleep(Duration::from_millis(5));

        let mut entries = store.entries.write();
        assert!(store.live_entry_mut(&mut entries, "key").is_none());
        assert!(!entries.contains_key("key"));
        drop(entries);

        assert_eq!(store.stats().expirations, 1);
    }
}
