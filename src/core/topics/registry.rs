use std::collections::HashMap;

use tracing::debug;

use crate::core::consumer::ConsumerId;
use crate::core::topics::pattern::TopicPattern;

/// One registered pattern and the subscribers attached to it.
#[derive(Debug, Clone)]
pub struct Subscription {
    pattern: TopicPattern,
    subscribers: Vec<ConsumerId>,
}

impl Subscription {
    pub fn pattern(&self) -> &TopicPattern {
        &self.pattern
    }

    pub fn subscribers(&self) -> &[ConsumerId] {
        &self.subscribers
    }
}

/// [`SubscriptionRegistry`] maps pattern strings to their subscribers.
///
/// Patterns are keyed by their exact text: two different strings matching the
/// same topics are tracked independently. Patterns keep first-registration
/// order, subscribers keep subscription order.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    subscriptions: Vec<Subscription>,
    index: HashMap<String, usize>,
}

impl SubscriptionRegistry {
    /// Creates a new empty [`SubscriptionRegistry`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `subscriber` to `pattern` unless already there. Returns `true` if added.
    pub fn subscribe(&mut self, pattern: &str, subscriber: ConsumerId) -> bool {
        let slot = match self.index.get(pattern) {
            Some(&slot) => slot,
            None => {
                debug!(target: "ferrymq::topics", pattern, "registering new pattern");
                self.subscriptions.push(Subscription {
                    pattern: TopicPattern::parse(pattern),
                    subscribers: Vec::new(),
                });
                let slot = self.subscriptions.len() - 1;
                self.index.insert(pattern.to_owned(), slot);
                slot
            }
        };

        let subscribers = &mut self.subscriptions[slot].subscribers;
        if subscribers.contains(&subscriber) {
            return false;
        }
        subscribers.push(subscriber);
        true
    }

    /// Subscriptions whose pattern matches `topic`, in registration order.
    pub fn matching<'a>(&'a self, topic: &'a str) -> impl Iterator<Item = &'a Subscription> + 'a {
        self.subscriptions
            .iter()
            .filter(move |sub| sub.pattern.matches(topic))
    }

    pub fn get(&self, pattern: &str) -> Option<&Subscription> {
        self.index.get(pattern).map(|&slot| &self.subscriptions[slot])
    }

    /// Number of distinct pattern strings.
    pub fn pattern_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subscription> {
        self.subscriptions.iter()
    }
}
