//! QueueManager maps queue names to their FIFO storage.
//!
//! Queues are created the first time any operation names them and live for
//! the rest of the process.

use std::collections::HashMap;

use crate::core::message::Message;
use crate::core::queue::MessageQueue;

#[derive(Debug, Default)]
pub struct QueueManager {
    /// Map of queue name → queue.
    queues: HashMap<String, MessageQueue>,
}

impl QueueManager {
    /// Creates a new, empty `QueueManager`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the named queue, creating it if absent.
    pub fn get_or_create(&mut self, name: &str) -> &mut MessageQueue {
        self.queues
            .entry(name.to_owned())
            .or_insert_with(MessageQueue::new)
    }

    /// Appends a message to the tail of the named queue.
    #[inline]
    pub fn enqueue(&mut self, name: &str, message: Message) {
        self.get_or_create(name).push_back(message);
    }

    pub fn get(&self, name: &str) -> Option<&MessageQueue> {
        self.queues.get(name)
    }

    /// Number of messages currently stored (expired ones included) in the named queue.
    pub fn len_of(&self, name: &str) -> usize {
        self.queues.get(name).map_or(0, MessageQueue::len)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MessageQueue)> {
        self.queues.iter().map(|(name, q)| (name.as_str(), q))
    }

    /// Total number of queues ever referenced.
    #[inline]
    pub fn count(&self) -> usize {
        self.queues.len()
    }
}
