//! Error types for the cache
//!
//! Provides unified error handling using thiserror. A missing or expired key
//! is never an error; callers see it as `false` or `None`.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache backends and the primitives built on them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// Stored value cannot be used for numeric arithmetic
    #[error("Value is not numeric: {key}")]
    NotNumeric { key: String },

    /// Value could not be coerced to the requested type
    #[error("Cannot cast {from} to {to}")]
    Cast { from: &'static str, to: &'static str },

    /// Transport or storage failure reported by a remote backend
    #[error("Backend error: {0}")]
    Backend(String),

    /// Configuration value out of range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl CacheError {
    /// Shorthand for a `NotNumeric` error on `key`.
    pub fn not_numeric(key: &str) -> Self {
        CacheError::NotNumeric {
            key: key.to_string(),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
