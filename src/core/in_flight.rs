//! Delivered-but-unacknowledged queue messages.
//!
//! A message sits here from the moment it is dispatched until it is acked or
//! nacked. Which consumer received it is not recorded.

use std::collections::HashMap;

use crate::core::message::{Message, MessageId};

#[derive(Debug, Default)]
pub struct InFlightTracker {
    by_queue: HashMap<String, HashMap<MessageId, Message>>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, queue: &str, message: Message) {
        self.by_queue
            .entry(queue.to_owned())
            .or_default()
            .insert(message.id.clone(), message);
    }

    /// Removes and returns the in-flight message, if any.
    pub fn take(&mut self, queue: &str, message_id: &str) -> Option<Message> {
        self.by_queue.get_mut(queue)?.remove(message_id)
    }

    pub fn contains(&self, queue: &str, message_id: &str) -> bool {
        self.by_queue
            .get(queue)
            .is_some_and(|set| set.contains_key(message_id))
    }

    pub fn len_of(&self, queue: &str) -> usize {
        self.by_queue.get(queue).map_or(0, HashMap::len)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HashMap<MessageId, Message>)> {
        self.by_queue.iter().map(|(name, set)| (name.as_str(), set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::with_custom_message;
    use serde_json::json;

    #[test]
    fn take_removes_exactly_once() {
        let mut tracker = InFlightTracker::new();
        tracker.insert("q", with_custom_message("m1".into(), json!(1), 10));

        assert!(tracker.contains("q", "m1"));
        assert!(tracker.take("q", "m1").is_some());
        assert!(tracker.take("q", "m1").is_none());
        assert_eq!(tracker.len_of("q"), 0);
    }

    #[test]
    fn sets_are_scoped_by_queue() {
        let mut tracker = InFlightTracker::new();
        tracker.insert("q1", with_custom_message("m1".into(), json!(1), 10));

        assert!(tracker.take("q2", "m1").is_none());
        assert!(tracker.contains("q1", "m1"));
    }
}
