//! Queue Module
//!
//! A named double-ended work queue with the same absence rules as the cache:
//! reading an empty queue yields `None`, not an error.

mod memory;

pub use memory::MemoryQueue;

use crate::error::Result;
use crate::models::{Caster, Value};

// == Queue Trait ==
pub trait Queue: Send + Sync {
    /// Appends `value` to the back of the queue.
    fn push(&self, value: Value) -> Result<()>;

    /// Removes and returns the oldest item.
    fn pull(&self) -> Result<Option<Value>>;

    /// Removes and returns the newest item.
    fn pop(&self) -> Result<Option<Value>>;

    /// `pull` wrapped in the coercion facade.
    fn cast(&self) -> Result<Caster> {
        Ok(Caster::new(self.pull()?))
    }

    fn length(&self) -> Result<usize>;

    fn clear(&self) -> Result<()>;
}
