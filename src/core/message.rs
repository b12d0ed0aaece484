use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::clock::{expiry_for, Ttl};

/// Opaque producer-supplied payload. The broker never inspects it.
pub type Payload = serde_json::Value;

/// Identifier assigned once when a message is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Fresh random (v4) identifier.
    pub fn generate() -> Self {
        MessageId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        MessageId(s.to_owned())
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        MessageId(s)
    }
}

impl AsRef<str> for MessageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MessageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub payload: Payload,
    /// Absolute expiry, milliseconds since epoch.
    pub expires_at: u64,
}

impl Message {
    /// Past its expiry and no longer deliverable.
    #[inline]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at
    }

    /// A nacked message goes back on the queue only while strictly before its expiry.
    #[inline]
    pub fn can_requeue(&self, now_ms: u64) -> bool {
        now_ms < self.expires_at
    }
}

pub fn new_message(payload: Payload, ttl: Ttl, now_ms: u64) -> Message {
    Message {
        id: MessageId::generate(),
        payload,
        expires_at: expiry_for(now_ms, ttl),
    }
}

pub fn with_custom_message(id: MessageId, payload: Payload, expires_at: u64) -> Message {
    Message {
        id,
        payload,
        expires_at,
    }
}
