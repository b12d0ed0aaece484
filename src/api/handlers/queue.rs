use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::handlers::{
    parse_ttl, present_payload, present_text, ApiError, ApiResult, StatusResponse,
};
use crate::api::ApiState;
use crate::core::consumer::ConsumerId;
use crate::core::message::{MessageId, Payload};

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub queue: Option<String>,
    pub message: Option<Payload>,
    pub ttl_seconds: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterConsumerRequest {
    pub queue: Option<String>,
    pub consumer_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReceiveQueueParams {
    pub queue: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    pub queue: Option<String>,
    pub message_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReceiveQueueResponse {
    Delivered {
        consumer: ConsumerId,
        message_id: MessageId,
        message: Payload,
    },
    Empty {
        message: Option<Payload>,
    },
}

impl ReceiveQueueResponse {
    fn empty() -> Self {
        ReceiveQueueResponse::Empty { message: None }
    }
}

/// `POST /send_queue`
pub async fn send_queue(
    State(state): State<ApiState>,
    body: Result<Json<SendRequest>, JsonRejection>,
) -> ApiResult<StatusResponse> {
    let Json(req) = body?;
    let (Some(queue), Some(message)) = (present_text(req.queue), present_payload(req.message))
    else {
        return Err(ApiError::InvalidRequest("Missing queue or message".into()));
    };
    let ttl = parse_ttl(req.ttl_seconds)?;

    let id = state.broker.send(&queue, message, ttl);
    Ok(Json(StatusResponse::with_id(
        format!("Message added to queue '{queue}'"),
        id,
    )))
}

/// `POST /register_queue_consumer`
pub async fn register_queue_consumer(
    State(state): State<ApiState>,
    body: Result<Json<RegisterConsumerRequest>, JsonRejection>,
) -> ApiResult<StatusResponse> {
    let Json(req) = body?;
    let (Some(queue), Some(consumer_id)) = (present_text(req.queue), present_text(req.consumer_id))
    else {
        return Err(ApiError::InvalidRequest("Missing queue or consumer_id".into()));
    };

    state
        .broker
        .register_consumer(&queue, ConsumerId::from(consumer_id.as_str()));
    Ok(Json(StatusResponse::new(format!(
        "{consumer_id} registered to queue '{queue}'"
    ))))
}

/// `GET /receive_queue?queue=<name>`. Never fails; nothing deliverable is `{"message": null}`.
pub async fn receive_queue(
    State(state): State<ApiState>,
    params: Result<Query<ReceiveQueueParams>, QueryRejection>,
) -> Json<ReceiveQueueResponse> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    let Some(queue) = present_text(params.queue) else {
        return Json(ReceiveQueueResponse::empty());
    };

    let response = match state.broker.receive(&queue) {
        Some(delivery) => ReceiveQueueResponse::Delivered {
            consumer: delivery.consumer,
            message_id: delivery.message_id,
            message: delivery.payload,
        },
        None => ReceiveQueueResponse::empty(),
    };
    Json(response)
}

fn settle_fields(req: SettleRequest) -> Result<(String, String), ApiError> {
    match (present_text(req.queue), present_text(req.message_id)) {
        (Some(queue), Some(message_id)) => Ok((queue, message_id)),
        _ => Err(ApiError::InvalidRequest(
            "Missing queue or message_id".into(),
        )),
    }
}

/// `POST /ack`
pub async fn ack(
    State(state): State<ApiState>,
    body: Result<Json<SettleRequest>, JsonRejection>,
) -> ApiResult<StatusResponse> {
    let Json(req) = body?;
    let (queue, message_id) = settle_fields(req)?;

    state.broker.ack(&queue, &message_id)?;
    Ok(Json(StatusResponse::new("ACK received, message removed")))
}

/// `POST /nack`. Success whether the message was requeued or dropped as expired.
pub async fn nack(
    State(state): State<ApiState>,
    body: Result<Json<SettleRequest>, JsonRejection>,
) -> ApiResult<StatusResponse> {
    let Json(req) = body?;
    let (queue, message_id) = settle_fields(req)?;

    state.broker.nack(&queue, &message_id)?;
    Ok(Json(StatusResponse::new("NACK received, message requeued")))
}
