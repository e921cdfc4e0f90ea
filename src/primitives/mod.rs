//! Primitives built on the cache contract
//!
//! Each primitive keeps its state in one cache entry under a key tagged with
//! the primitive kind, so limiters and verification codes sharing a backend
//! never collide.

mod limiter;
mod verification;

pub use limiter::RateLimiter;
pub use verification::VerificationCode;

/// Separator between a primitive's kind tag and its name.
pub const KEY_SEPARATOR: char = ':';

fn namespaced_key(prefix: &str, name: &str) -> String {
    format!("{prefix}{KEY_SEPARATOR}{name}")
}
