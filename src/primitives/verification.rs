//! One-time verification codes
//!
//! A single pending code per name, stored as one cache entry whose TTL is
//! the code's validity window.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::cache::Cache;
use crate::config::Config;
use crate::error::Result;
use crate::primitives::namespaced_key;

const KEY_PREFIX: &str = "verify";

// == Verification Code ==
/// Stores, generates and checks the pending code for one name.
#[derive(Clone)]
pub struct VerificationCode {
    key: String,
    ttl: Duration,
    code_length: usize,
    cache: Arc<dyn Cache>,
}

impl VerificationCode {
    pub fn new(name: &str, ttl: Duration, cache: Arc<dyn Cache>) -> Self {
        Self {
            key: namespaced_key(KEY_PREFIX, name),
            ttl,
            code_length: Config::default().verification_code_length,
            cache,
        }
    }

    /// Builds a verification code with the TTL and code length from `config`.
    pub fn from_config(name: &str, config: &Config, cache: Arc<dyn Cache>) -> Self {
        Self {
            code_length: config.verification_code_length,
            ..Self::new(name, config.verification_ttl(), cache)
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    // == Set ==
    /// Stores `code`. A pending code is replaced without extending its
    /// window; otherwise a new window starts.
    pub fn set(&self, code: &str) -> Result<()> {
        if !self.cache.update(&self.key, code.into())? {
            self.cache.put(&self.key, code.into(), Some(self.ttl))?;
        }
        Ok(())
    }

    // == Generate ==
    /// Stores and returns a random code of `length` decimal digits.
    pub fn generate(&self, length: usize) -> Result<String> {
        let code = random_digits(length);
        self.set(&code)?;

        debug!(key = %self.key, length, "Verification code generated");
        Ok(code)
    }

    /// `generate` with the configured code length.
    pub fn generate_default(&self) -> Result<String> {
        self.generate(self.code_length)
    }

    // == Clear ==
    pub fn clear(&self) -> Result<()> {
        self.cache.forget(&self.key)
    }

    // == Get ==
    /// Returns the pending code, if any.
    pub fn get(&self) -> Result<Option<String>> {
        let caster = self.cache.cast(&self.key)?;
        if caster.is_nil() {
            return Ok(None);
        }

        caster.to_string_value().map(Some)
    }

    // == Validate ==
    /// Checks `code` against the pending code, exactly and case-sensitively.
    ///
    /// Empty codes never match, and no pending code is a mismatch rather than
    /// an error.
    pub fn validate(&self, code: &str) -> Result<bool> {
        Ok(match self.get()? {
            Some(stored) if !stored.is_empty() && !code.is_empty() => stored == code,
            _ => false,
        })
    }

    // == Exists ==
    pub fn exists(&self) -> Result<bool> {
        self.cache.exists(&self.key)
    }

    // == TTL ==
    pub fn ttl(&self) -> Result<Duration> {
        self.cache.ttl(&self.key)
    }
}

impl std::fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationCode")
            .field("key", &self.key)
            .field("ttl", &self.ttl)
            .field("code_length", &self.code_length)
            .finish_non_exhaustive()
    }
}

fn random_digits(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(rng.gen_range(b'0'..=b'9')))
        .collect()
}
