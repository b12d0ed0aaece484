pub mod broker;
pub mod clock;
pub mod consumer;
pub mod error;
pub mod in_flight;
pub mod message;
pub mod queue;
pub mod topics;

pub use broker::{
    Broker, BrokerSnapshot, BrokerStats, Delivery, NackOutcome, QueueStats, TopicDelivery,
};
pub use clock::{Clock, ManualClock, SystemClock, Ttl};
pub use error::BrokerError;
