//! Mini Cache - A storage-agnostic TTL cache
//!
//! Provides a `Cache` contract with an in-memory backend, and a fixed-window
//! rate limiter and one-time verification codes built purely on that
//! contract.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod primitives;
pub mod queue;
pub mod tasks;

pub use cache::{Cache, MemoryCache, NO_EXPIRY};
pub use config::Config;
pub use error::{CacheError, Result};
pub use models::{Caster, Value};
pub use primitives::{RateLimiter, VerificationCode};
pub use queue::{MemoryQueue, Queue};
pub use tasks::{spawn_cleanup_task, spawn_configured_cleanup};
