//! Cache contract
//!
//! Every backend implements `Cache`, and the rate limiter and verification
//! code are written only against this trait. Key namespacing is left to each
//! backend.

use std::time::Duration;

use crate::error::Result;
use crate::models::{Caster, Value};

/// TTL reported for an entry stored without expiry.
pub const NO_EXPIRY: Duration = Duration::MAX;

// == Cache Trait ==
/// Key-value store with per-key TTL and numeric mutation.
///
/// A missing or expired key is never an error: reads return `None`, and
/// conditional writes return `false`. Errors are reserved for values that
/// cannot be coerced and for backend I/O failures.
pub trait Cache: Send + Sync {
    /// Stores `value`, replacing any existing entry and its TTL.
    /// `ttl` of `None` stores the value without expiry.
    fn put(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<()>;

    /// Replaces the value of an existing key, keeping its TTL.
    /// Returns false, without writing, when the key does not exist.
    fn update(&self, key: &str, value: Value) -> Result<bool>;

    /// `update` when the key exists, `put` with `ttl` otherwise.
    fn put_or_update(&self, key: &str, value: Value, ttl: Option<Duration>) -> Result<()> {
        if !self.update(key, value.clone())? {
            self.put(key, value, ttl)?;
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Reads and removes the key.
    fn pull(&self, key: &str) -> Result<Option<Value>>;

    /// Reads the key through the coercion facade.
    fn cast(&self, key: &str) -> Result<Caster> {
        Ok(Caster::new(self.get(key)?))
    }

    fn exists(&self, key: &str) -> Result<bool>;

    /// Removes the key. Forgetting a missing key is not an error.
    fn forget(&self, key: &str) -> Result<()>;

    /// Remaining time to live: `NO_EXPIRY` for entries without expiry and
    /// zero for missing keys.
    fn ttl(&self, key: &str) -> Result<Duration>;

    /// Adds `delta` to the integer value of an existing key, keeping its TTL.
    /// Returns false when the key does not exist.
    fn increment(&self, key: &str, delta: i64) -> Result<bool>;

    fn decrement(&self, key: &str, delta: i64) -> Result<bool>;

    fn increment_float(&self, key: &str, delta: f64) -> Result<bool>;

    fn decrement_float(&self, key: &str, delta: f64) -> Result<bool>;
}
