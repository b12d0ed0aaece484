//! FerryMQ queue module.
//!
//! A [`MessageQueue`] is a plain FIFO of messages. Expiry is lazy: the only
//! place expired messages are removed is the head scan performed right before
//! a dispatch attempt. There is no background sweep.
//!
//! [`QueueManager`] maps queue names to queues and creates them on first
//! reference. Topic fan-out copies live in the same manager under
//! `pattern:subscriber` keys.

pub mod manager;

pub use manager::QueueManager;

use std::collections::VecDeque;

use tracing::debug;

use crate::core::message::{Message, MessageId};

#[derive(Debug, Default)]
pub struct MessageQueue {
    messages: VecDeque<Message>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends at the tail.
    #[inline]
    pub fn push_back(&mut self, message: Message) {
        self.messages.push_back(message);
    }

    /// Drops expired messages sitting at the head. Returns how many were dropped.
    ///
    /// Stops at the first live message; expired messages behind it stay put
    /// until they reach the head themselves.
    pub fn reap_expired_head(&mut self, now_ms: u64) -> usize {
        let mut dropped = 0;
        while let Some(head) = self.messages.front() {
            if !head.is_expired(now_ms) {
                break;
            }
            if let Some(expired) = self.messages.pop_front() {
                debug!(
                    target: "ferrymq::queue",
                    message_id = %expired.id,
                    expires_at = expired.expires_at,
                    "dropping expired message"
                );
            }
            dropped += 1;
        }
        dropped
    }

    /// Head after the expiry scan, without removing it.
    pub fn peek_live_head(&mut self, now_ms: u64) -> Option<&Message> {
        self.reap_expired_head(now_ms);
        self.messages.front()
    }

    /// Head after the expiry scan, removed from the queue.
    pub fn pop_live_head(&mut self, now_ms: u64) -> Option<Message> {
        self.reap_expired_head(now_ms);
        self.messages.pop_front()
    }

    #[inline]
    pub fn pop_front(&mut self) -> Option<Message> {
        self.messages.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &MessageId> {
        self.messages.iter().map(|m| &m.id)
    }
}
