//! HTTP request handlers for FerryMQ
//!
//! - `queue`: send, consumer registration, receive, ack and nack
//! - `topic`: subscribe, publish and topic receive
//! - here: liveness probe, stats, and the error/response types both share

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::api::ApiState;
use crate::core::broker::BrokerStats;
use crate::core::clock::Ttl;
use crate::core::error::BrokerError;
use crate::core::message::{MessageId, Payload};

// Module exports
pub mod queue;
pub mod topic;

/// Body of `GET /`.
pub const HEALTH_TEXT: &str = "Message Broker is Running";

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Message not found")]
    NotFound,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<BrokerError> for ApiError {
    fn from(err: BrokerError) -> Self {
        match err {
            BrokerError::InvalidRequest(reason) => ApiError::InvalidRequest(reason),
            BrokerError::NotFound { .. } => ApiError::NotFound,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(target: "ferrymq::api", "request rejected: {}", self);

        let status = self.status_code();
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// `{"status": ..., "id": ...}`; `id` only for operations that create a message.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<MessageId>,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            id: None,
        }
    }

    pub fn with_id(status: impl Into<String>, id: MessageId) -> Self {
        Self {
            status: status.into(),
            id: Some(id),
        }
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Absent and empty strings both count as missing.
pub(crate) fn present_text(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

/// Absent, `null` and `""` all count as missing.
pub(crate) fn present_payload(field: Option<Payload>) -> Option<Payload> {
    field.filter(|v| !matches!(v, Payload::Null) && v.as_str() != Some(""))
}

pub(crate) fn parse_ttl(ttl_seconds: Option<f64>) -> Result<Option<Ttl>, ApiError> {
    ttl_seconds
        .map(Ttl::from_secs)
        .transpose()
        .map_err(ApiError::from)
}

/// Liveness probe.
pub async fn health_check() -> &'static str {
    HEALTH_TEXT
}

pub async fn stats(State(state): State<ApiState>) -> Json<BrokerStats> {
    Json(state.broker.stats())
}
