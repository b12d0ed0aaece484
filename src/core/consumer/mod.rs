//! FerryMQ consumer module.
//!
//! Provides the `ConsumerId` used by both queue consumers and topic
//! subscribers, and the per-queue round-robin bookkeeping.

#[allow(clippy::module_inception)]
pub mod consumer;
pub mod registry;

pub use consumer::{ConsumerGroup, ConsumerId};
pub use registry::ConsumerRegistry;
