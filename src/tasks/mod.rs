//! Background Tasks Module
//!
//! # Tasks
//! - TTL Cleanup: Purges expired entries from a `MemoryCache` at a fixed interval

mod cleanup;

pub use cleanup::{spawn_cleanup_task, spawn_configured_cleanup};
