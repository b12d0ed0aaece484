use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Identifier of a queue consumer or topic subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsumerId(pub String);

impl ConsumerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConsumerId {
    fn from(s: &str) -> Self {
        ConsumerId(s.to_owned())
    }
}

impl From<String> for ConsumerId {
    fn from(s: String) -> Self {
        ConsumerId(s)
    }
}

impl From<ConsumerId> for String {
    fn from(id: ConsumerId) -> Self {
        id.0
    }
}

impl AsRef<str> for ConsumerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ConsumerId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Consumers registered on one queue, in registration order, plus the
/// round-robin cursor.
///
/// The cursor moves by exactly one per dispatch and by nothing else, so the
/// selected consumer is `consumers[cursor % len]` at the time of dispatch.
#[derive(Debug, Default, Clone)]
pub struct ConsumerGroup {
    consumers: Vec<ConsumerId>,
    cursor: u64,
}

impl ConsumerGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` unless already present. Returns `true` if it was added.
    pub fn register(&mut self, id: ConsumerId) -> bool {
        if self.consumers.contains(&id) {
            return false;
        }
        self.consumers.push(id);
        true
    }

    /// Picks the consumer for the next dispatch and advances the cursor.
    /// `None` (and no cursor movement) when nobody is registered.
    pub fn next_consumer(&mut self) -> Option<ConsumerId> {
        if self.consumers.is_empty() {
            return None;
        }
        let index = (self.cursor % self.consumers.len() as u64) as usize;
        self.cursor = self.cursor.wrapping_add(1);
        Some(self.consumers[index].clone())
    }

    #[inline]
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }

    pub fn consumers(&self) -> &[ConsumerId] {
        &self.consumers
    }
}
