//! In-memory queue backed by a `VecDeque`.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::Result;
use crate::models::Value;
use crate::queue::Queue;

// == Memory Queue ==
/// Thread-safe in-memory queue.
///
/// Front = oldest item, Back = newest item.
#[derive(Debug)]
pub struct MemoryQueue {
    name: String,
    items: Mutex<VecDeque<Value>>,
}

impl MemoryQueue {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            items: Mutex::new(VecDeque::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Queue for MemoryQueue {
    fn push(&self, value: Value) -> Result<()> {
        let len = {
            let mut items = self.items.lock();
            items.push_back(value);
            items.len()
        };

        trace!(queue = %self.name, len, "Pushed item");
        Ok(())
    }

    fn pull(&self) -> Result<Option<Value>> {
        Ok(self.items.lock().pop_front())
    }

    fn pop(&self) -> Result<Option<Value>> {
        Ok(self.items.lock().pop_back())
    }

    fn length(&self) -> Result<usize> {
        Ok(self.items.lock().len())
    }

    fn clear(&self) -> Result<()> {
        self.items.lock().clear();
        Ok(())
    }
}
