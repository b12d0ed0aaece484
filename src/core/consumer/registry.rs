use std::collections::HashMap;

use crate::core::consumer::{ConsumerGroup, ConsumerId};

/// Per-queue consumer groups.
#[derive(Debug, Default)]
pub struct ConsumerRegistry {
    groups: HashMap<String, ConsumerGroup>,
}

impl ConsumerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently registers `consumer` on `queue`. Returns `true` if newly added.
    pub fn register(&mut self, queue: &str, consumer: ConsumerId) -> bool {
        self.groups
            .entry(queue.to_owned())
            .or_default()
            .register(consumer)
    }

    pub fn group(&self, queue: &str) -> Option<&ConsumerGroup> {
        self.groups.get(queue)
    }

    pub fn group_mut(&mut self, queue: &str) -> Option<&mut ConsumerGroup> {
        self.groups.get_mut(queue)
    }

    /// Whether at least one consumer is registered on `queue`.
    pub fn has_consumers(&self, queue: &str) -> bool {
        self.groups.get(queue).is_some_and(|g| !g.is_empty())
    }

    /// Round-robin pick for `queue`, advancing its cursor.
    pub fn next_consumer(&mut self, queue: &str) -> Option<ConsumerId> {
        self.groups.get_mut(queue)?.next_consumer()
    }

    pub fn count_for(&self, queue: &str) -> usize {
        self.groups.get(queue).map_or(0, ConsumerGroup::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_are_independent_per_queue() {
        let mut registry = ConsumerRegistry::new();
        registry.register("q1", "A".into());
        registry.register("q1", "B".into());
        registry.register("q2", "Z".into());

        assert_eq!(registry.next_consumer("q1").as_deref(), Some("A"));
        assert_eq!(registry.next_consumer("q2").as_deref(), Some("Z"));
        assert_eq!(registry.next_consumer("q1").as_deref(), Some("B"));
        assert!(registry.next_consumer("q3").is_none());

        assert_eq!(registry.count_for("q1"), 2);
        assert!(!registry.has_consumers("q3"));
    }
}
