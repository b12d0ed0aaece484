//! FerryMQ HTTP API
//!
//! Thin transport over [`Broker`]: parses requests, checks required fields,
//! serializes results and maps outcomes to status codes. All broker
//! semantics live in `core`.

pub mod handlers;
pub mod rest;

pub use rest::{create_router, serve};

use std::sync::Arc;

use crate::core::broker::Broker;

/// Shared application state for API handlers
#[derive(Debug, Clone)]
pub struct ApiState {
    pub broker: Arc<Broker>,
}

impl ApiState {
    pub fn new(broker: Arc<Broker>) -> Self {
        Self { broker }
    }
}
