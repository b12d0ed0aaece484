//! REST API server and routing.
//!
//! Route paths match the broker's historical HTTP surface so existing
//! producer and consumer scripts keep working.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::handlers::{self, queue, topic};
use crate::api::ApiState;
use crate::core::broker::Broker;

/// Builds the complete router with all endpoints.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::health_check))
        .route("/stats", get(handlers::stats))
        .route("/send_queue", post(queue::send_queue))
        .route("/register_queue_consumer", post(queue::register_queue_consumer))
        .route("/receive_queue", get(queue::receive_queue))
        .route("/ack", post(queue::ack))
        .route("/nack", post(queue::nack))
        .route("/subscribe", post(topic::subscribe))
        .route("/publish", post(topic::publish))
        .route("/receive_topic", get(topic::receive_topic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `bind_addr` and serves the API until Ctrl-C.
pub async fn serve(bind_addr: &str, broker: Arc<Broker>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!(target: "ferrymq::api", "FerryMQ listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(ApiState::new(broker)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(target: "ferrymq::api", "FerryMQ stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(target: "ferrymq::api", "shutdown signal received"),
        Err(e) => {
            warn!(target: "ferrymq::api", "unable to listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
    }
}
