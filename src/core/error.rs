use thiserror::Error;

/// Failures surfaced by broker operations.
///
/// Empty receives and expired-message drops are not errors; they show up as
/// `None` results or simply never surface at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerError {
    /// A required input was absent or malformed. Nothing was mutated.
    #[error("{0}")]
    InvalidRequest(String),

    /// The message is not in flight on this queue: already acked, never
    /// dispatched, or dropped after expiring.
    #[error("Message not found")]
    NotFound { queue: String, message_id: String },
}

impl BrokerError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        BrokerError::InvalidRequest(reason.into())
    }

    pub fn not_found(queue: &str, message_id: &str) -> Self {
        BrokerError::NotFound {
            queue: queue.to_owned(),
            message_id: message_id.to_owned(),
        }
    }
}
