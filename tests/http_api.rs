//! End-to-end tests of the HTTP surface against an in-process router.

#[path = "common.rs"]
mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt; // For `oneshot`

use ferrymq::api::{create_router, ApiState};
use ferrymq::Broker;

fn app() -> Router {
    common::init_logging();
    create_router(ApiState::new(Arc::new(Broker::new())))
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    call(app, request).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    call(app, request).await
}

#[tokio::test]
async fn health_check_returns_constant_text() {
    let app = app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"Message Broker is Running");
}

#[tokio::test]
async fn queue_send_receive_ack_flow() {
    let app = app();

    let (status, body) = post(
        &app,
        "/register_queue_consumer",
        json!({"queue": "my_queue", "consumer_id": "consumer1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "consumer1 registered to queue 'my_queue'");

    let (status, body) = post(
        &app,
        "/send_queue",
        json!({"queue": "my_queue", "message": "Hello Queue", "ttl_seconds": 10}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Message added to queue 'my_queue'");
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = get(&app, "/receive_queue?queue=my_queue").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["consumer"], "consumer1");
    assert_eq!(body["message_id"], id.as_str());
    assert_eq!(body["message"], "Hello Queue");

    let (status, body) = get(&app, "/receive_queue?queue=my_queue").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": null}));

    let (status, body) = post(&app, "/ack", json!({"queue": "my_queue", "message_id": id})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ACK received, message removed");

    let (status, body) = post(&app, "/ack", json!({"queue": "my_queue", "message_id": id})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Message not found");
}

#[tokio::test]
async fn nack_requeues_over_http() {
    let app = app();
    post(&app, "/register_queue_consumer", json!({"queue": "q", "consumer_id": "c"})).await;
    post(&app, "/send_queue", json!({"queue": "q", "message": {"n": 1}})).await;

    let (_, first) = get(&app, "/receive_queue?queue=q").await;
    let (status, body) = post(
        &app,
        "/nack",
        json!({"queue": "q", "message_id": first["message_id"]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "NACK received, message requeued");

    let (_, again) = get(&app, "/receive_queue?queue=q").await;
    assert_eq!(again["message_id"], first["message_id"]);
    assert_eq!(again["message"], json!({"n": 1}));

    let (status, _) = post(&app, "/nack", json!({"queue": "q", "message_id": "bogus"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn topic_subscribe_publish_receive_flow() {
    let app = app();

    let (status, body) = post(
        &app,
        "/subscribe",
        json!({"topic_pattern": "sports.*", "consumer_id": "s1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "s1 subscribed to topic 'sports.*'");

    let (status, body) = post(
        &app,
        "/publish",
        json!({"topic": "sports.football", "message": "goal"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Message published to topic 'sports.football'");
    let id = body["id"].clone();

    let (_, body) = get(&app, "/receive_topic?topic=sports.football&consumer_id=s1").await;
    assert_eq!(body, json!({"message": null}));

    let (status, body) = get(&app, "/receive_topic?topic=sports.*&consumer_id=s1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message_id": id, "message": "goal"}));
}

#[tokio::test]
async fn subscribe_accepts_legacy_topic_field() {
    let app = app();
    let (status, _) = post(
        &app,
        "/subscribe",
        json!({"topic": "sports.football", "consumer_id": "consumer2"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    post(&app, "/publish", json!({"topic": "sports.football", "message": "Goal Scored!"})).await;
    let (_, body) = get(&app, "/receive_topic?topic=sports.football&consumer_id=consumer2").await;
    assert_eq!(body["message"], "Goal Scored!");
}

#[tokio::test]
async fn missing_required_fields_are_bad_requests() {
    let app = app();
    let cases = [
        ("/send_queue", json!({"queue": "q"})),
        ("/send_queue", json!({"message": "m"})),
        ("/send_queue", json!({"queue": "", "message": "m"})),
        ("/send_queue", json!({"queue": "q", "message": null})),
        ("/register_queue_consumer", json!({"queue": "q"})),
        ("/ack", json!({"queue": "q"})),
        ("/nack", json!({"message_id": "x"})),
        ("/subscribe", json!({"consumer_id": "c"})),
        ("/publish", json!({"topic": "t"})),
    ];

    for (uri, body) in cases {
        let (status, response) = post(&app, uri, body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {body}");
        assert!(response["error"].is_string(), "{uri} {body}");
    }

    let stats = get(&app, "/stats").await.1;
    assert_eq!(stats["queues"], json!([]));
}

#[tokio::test]
async fn invalid_ttl_and_malformed_bodies_are_bad_requests() {
    let app = app();
    let (status, _) = post(
        &app,
        "/send_queue",
        json!({"queue": "q", "message": "m", "ttl_seconds": -1}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/publish",
        json!({"topic": "t", "message": "m", "ttl_seconds": "ten"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/send_queue")
        .body(Body::from("queue=q"))
        .unwrap();
    let (status, _) = call(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn receives_without_parameters_return_null() {
    let app = app();
    for uri in ["/receive_queue", "/receive_topic", "/receive_topic?topic=t"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!({"message": null}), "{uri}");
    }
}

#[tokio::test]
async fn fractional_ttl_is_accepted() {
    let app = app();
    let (status, body) = post(
        &app,
        "/send_queue",
        json!({"queue": "q", "message": "m", "ttl_seconds": 0.5}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn stats_reflect_queue_state() {
    let app = app();
    post(&app, "/register_queue_consumer", json!({"queue": "q", "consumer_id": "c"})).await;
    post(&app, "/send_queue", json!({"queue": "q", "message": "a"})).await;
    post(&app, "/send_queue", json!({"queue": "q", "message": "b"})).await;
    get(&app, "/receive_queue?queue=q").await;

    let (status, body) = get(&app, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "queues": [{"name": "q", "depth": 1, "in_flight": 1, "consumers": 1}],
            "subscription_patterns": 0
        })
    );
}
