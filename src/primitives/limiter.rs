//! Fixed-window rate limiter
//!
//! The whole limiter state is one cache entry holding the remaining attempt
//! count, stored with the window as its TTL. The first hit creates the entry
//! and starts the window; the budget comes back only when the entry expires
//! or is reset.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::cache::Cache;
use crate::config::Config;
use crate::error::Result;
use crate::primitives::namespaced_key;

const KEY_PREFIX: &str = "limiter";

// == Rate Limiter ==
/// Counts attempts against a fixed budget per time window.
///
/// Holds only configuration; all state lives in the cache, so two limiters
/// built with the same name over the same cache share one budget.
#[derive(Clone)]
pub struct RateLimiter {
    key: String,
    max_attempts: u32,
    window: Duration,
    cache: Arc<dyn Cache>,
}

impl RateLimiter {
    pub fn new(name: &str, max_attempts: u32, window: Duration, cache: Arc<dyn Cache>) -> Self {
        Self {
            key: namespaced_key(KEY_PREFIX, name),
            max_attempts,
            window,
            cache,
        }
    }

    /// Builds a limiter with the budget and window from `config`.
    pub fn from_config(name: &str, config: &Config, cache: Arc<dyn Cache>) -> Self {
        Self::new(name, config.limiter_max_attempts, config.limiter_window(), cache)
    }

    /// Cache key holding the remaining attempts.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    // == Hit ==
    /// Consumes one attempt, starting a new window if none is active.
    ///
    /// The counter is not floored at zero; further hits keep it locked.
    pub fn hit(&self) -> Result<()> {
        if !self.cache.decrement(&self.key, 1)? {
            let remaining = i64::from(self.max_attempts) - 1;
            self.cache.put(&self.key, remaining.into(), Some(self.window))?;
        }

        trace!(key = %self.key, "Limiter hit");
        Ok(())
    }

    // == Lock ==
    /// Exhausts the remaining attempts. An active window keeps its TTL.
    pub fn lock(&self) -> Result<()> {
        if !self.cache.update(&self.key, 0i64.into())? {
            self.cache.put(&self.key, 0i64.into(), Some(self.window))?;
        }

        debug!(key = %self.key, "Limiter locked");
        Ok(())
    }

    // == Reset ==
    /// Restores the full budget and starts a fresh window.
    pub fn reset(&self) -> Result<()> {
        self.cache
            .put(&self.key, self.max_attempts.into(), Some(self.window))?;

        debug!(key = %self.key, "Limiter reset");
        Ok(())
    }

    // == Clear ==
    pub fn clear(&self) -> Result<()> {
        self.cache.forget(&self.key)
    }

    // == Must Lock ==
    /// True while a window is active and no attempts remain.
    pub fn must_lock(&self) -> Result<bool> {
        Ok(self.remaining()?.is_some_and(|n| n <= 0))
    }

    // == Total Attempts ==
    /// Attempts used in the current window, between 0 and `max_attempts`.
    pub fn total_attempts(&self) -> Result<u32> {
        Ok(match self.remaining()? {
            None => 0,
            Some(n) => {
                let max = i64::from(self.max_attempts);
                let used = max - n.clamp(0, max);
                // 0 <= used <= max, so it fits
                u32::try_from(used).unwrap_or(self.max_attempts)
            }
        })
    }

    // == Retries Left ==
    /// Remaining attempts, reading negative counters as zero. A limiter with
    /// no active window reports zero.
    pub fn retries_left(&self) -> Result<u32> {
        Ok(match self.remaining()? {
            None => 0,
            Some(n) => u32::try_from(n.max(0)).unwrap_or(u32::MAX),
        })
    }

    // == Available In ==
    /// Time until the current window ends.
    pub fn available_in(&self) -> Result<Duration> {
        self.cache.ttl(&self.key)
    }

    /// Raw counter, or None when no window is active.
    fn remaining(&self) -> Result<Option<i64>> {
        let caster = self.cache.cast(&self.key)?;
        if caster.is_nil() {
            return Ok(None);
        }

        caster.to_i64().map(Some)
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("key", &self.key)
            .field("max_attempts", &self.max_attempts)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}
