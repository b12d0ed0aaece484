//! Topic module: pattern matching, subscriptions, and virtual queue keys.

pub mod pattern;
pub mod registry;

pub use pattern::TopicPattern;
pub use registry::{Subscription, SubscriptionRegistry};

/// Key of the per-subscriber virtual queue: `<topic-or-pattern>:<subscriber>`.
///
/// Publish keys copies by the matching *pattern*; topic receive keys lookups by
/// the *topic* it was given. The two only meet when those strings are equal.
pub fn virtual_queue_key(topic_or_pattern: &str, subscriber: &str) -> String {
    format!("{topic_or_pattern}:{subscriber}")
}
