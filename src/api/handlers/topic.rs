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
pub struct SubscribeRequest {
    /// Older clients send this as `topic`.
    #[serde(alias = "topic")]
    pub topic_pattern: Option<String>,
    pub consumer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub topic: Option<String>,
    pub message: Option<Payload>,
    pub ttl_seconds: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReceiveTopicParams {
    pub topic: Option<String>,
    pub consumer_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReceiveTopicResponse {
    Delivered {
        message_id: MessageId,
        message: Payload,
    },
    Empty {
        message: Option<Payload>,
    },
}

/// `POST /subscribe`
pub async fn subscribe(
    State(state): State<ApiState>,
    body: Result<Json<SubscribeRequest>, JsonRejection>,
) -> ApiResult<StatusResponse> {
    let Json(req) = body?;
    let (Some(pattern), Some(consumer_id)) =
        (present_text(req.topic_pattern), present_text(req.consumer_id))
    else {
        return Err(ApiError::InvalidRequest(
            "Missing topic_pattern or consumer_id".into(),
        ));
    };

    state
        .broker
        .subscribe(&pattern, ConsumerId::from(consumer_id.as_str()));
    Ok(Json(StatusResponse::new(format!(
        "{consumer_id} subscribed to topic '{pattern}'"
    ))))
}

/// `POST /publish`
pub async fn publish(
    State(state): State<ApiState>,
    body: Result<Json<PublishRequest>, JsonRejection>,
) -> ApiResult<StatusResponse> {
    let Json(req) = body?;
    let (Some(topic), Some(message)) = (present_text(req.topic), present_payload(req.message))
    else {
        return Err(ApiError::InvalidRequest("Missing topic or message".into()));
    };
    let ttl = parse_ttl(req.ttl_seconds)?;

    let id = state.broker.publish(&topic, message, ttl);
    Ok(Json(StatusResponse::with_id(
        format!("Message published to topic '{topic}'"),
        id,
    )))
}

/// `GET /receive_topic?topic=<t>&consumer_id=<c>`. Never fails.
///
/// `topic` must be the pattern string the consumer subscribed with.
pub async fn receive_topic(
    State(state): State<ApiState>,
    params: Result<Query<ReceiveTopicParams>, QueryRejection>,
) -> Json<ReceiveTopicResponse> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    let empty = ReceiveTopicResponse::Empty { message: None };
    let (Some(topic), Some(consumer_id)) =
        (present_text(params.topic), present_text(params.consumer_id))
    else {
        return Json(empty);
    };

    let response = match state.broker.receive_topic(&topic, &consumer_id) {
        Some(delivery) => ReceiveTopicResponse::Delivered {
            message_id: delivery.message_id,
            message: delivery.payload,
        },
        None => empty,
    };
    Json(response)
}
