//! FerryMQ – a single-process, in-memory message broker.
//!
//! This crate exports
//!  * `core`    – the broker engine: queues, round-robin dispatch, in-flight
//!    tracking, TTL expiry, pattern subscriptions and fan-out
//!  * `api`     – HTTP transport over the engine
//!  * `config`  – TOML-driven runtime configuration
//!  * `logging` – tracing subscriber setup
//!
//! Downstream applications can embed the [`Broker`] directly or serve it over
//! HTTP with [`start_broker`].

// ───────────────────────────────────────────────────────────
// Public modules
// ───────────────────────────────────────────────────────────
pub mod api;
pub mod config;
pub mod core;
pub mod logging;

// ───────────────────────────────────────────────────────────
// Re-exports
// ───────────────────────────────────────────────────────────
pub use crate::api::serve as start_broker;
pub use crate::config::{load_config, Config};
pub use crate::core::broker::Broker;
