//! Configuration Module
//!
//! Loads defaults for the sweeper and the derived primitives from environment
//! variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache and primitive configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Background sweep interval in seconds, 0 = lazy expiry only
    pub cleanup_interval: u64,
    /// Attempts allowed per rate limiter window
    pub limiter_max_attempts: u32,
    /// Rate limiter window in seconds
    pub limiter_window: u64,
    /// Verification code lifetime in seconds
    pub verification_ttl: u64,
    /// Digits in a generated verification code
    pub verification_code_length: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 0, disabled)
    /// - `LIMITER_MAX_ATTEMPTS` - Attempts per window (default: 5)
    /// - `LIMITER_WINDOW` - Window length in seconds (default: 60)
    /// - `VERIFICATION_TTL` - Code lifetime in seconds (default: 300)
    /// - `VERIFICATION_CODE_LENGTH` - Generated code digits (default: 6)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cleanup_interval: env_or("CACHE_CLEANUP_INTERVAL", defaults.cleanup_interval),
            limiter_max_attempts: env_or("LIMITER_MAX_ATTEMPTS", defaults.limiter_max_attempts),
            limiter_window: env_or("LIMITER_WINDOW", defaults.limiter_window),
            verification_ttl: env_or("VERIFICATION_TTL", defaults.verification_ttl),
            verification_code_length: env_or(
                "VERIFICATION_CODE_LENGTH",
                defaults.verification_code_length,
            ),
        }
    }

    /// Rejects budgets and windows that would make the primitives useless.
    pub fn validate(&self) -> Result<()> {
        if self.limiter_max_attempts == 0 {
            return Err(CacheError::InvalidConfig(
                "LIMITER_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }
        if self.limiter_window == 0 {
            return Err(CacheError::InvalidConfig(
                "LIMITER_WINDOW must be at least 1 second".to_string(),
            ));
        }
        if self.verification_ttl == 0 {
            return Err(CacheError::InvalidConfig(
                "VERIFICATION_TTL must be at least 1 second".to_string(),
            ));
        }
        if self.verification_code_length == 0 {
            return Err(CacheError::InvalidConfig(
                "VERIFICATION_CODE_LENGTH must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn limiter_window(&self) -> Duration {
        Duration::from_secs(self.limiter_window)
    }

    pub fn verification_ttl(&self) -> Duration {
        Duration::from_secs(self.verification_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cleanup_interval: 0,
            limiter_max_attempts: 5,
            limiter_window: 60,
            verification_ttl: 300,
            verification_code_length: 6,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
