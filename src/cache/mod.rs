//! Cache Module
//!
//! The `Cache` contract and its in-memory backend with lazy TTL expiry.

mod contract;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use contract::{Cache, NO_EXPIRY};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::MemoryCache;
