//! Value models shared by caches and queues
//!
//! `Value` is what gets stored; `Caster` is the coercion facade handed back
//! by `cast` reads.

pub mod caster;
pub mod value;

// Re-export commonly used types
pub use caster::Caster;
pub use value::Value;
