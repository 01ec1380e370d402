use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use futures_util::StreamExt;
use serde_json::json;
use tower::ServiceExt;

use crate::broker::Broker;
use crate::transport::http::{AppState, router};
use crate::transport::message::PublishRequest;

fn setup() -> (Arc<Broker>, AppState) {
    let broker = Arc::new(Broker::new());
    let state = AppState::new(broker.clone());
    (broker, state)
}

async fn send(state: &AppState, method: Method, uri: &str, body: impl Into<Body>) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body.into())
        .unwrap();
    router(state.clone()).oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn next_chunk<S>(stream: &mut S) -> String
where
    S: futures_util::Stream<Item = Result<Bytes, axum::Error>> + Unpin,
{
    let chunk = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("timed out waiting for a chunk")
        .expect("stream ended")
        .expect("body error");
    String::from_utf8(chunk.to_vec()).unwrap()
}

#[test]
fn test_publish_request_requires_both_fields() {
    let full: PublishRequest =
        serde_json::from_value(json!({"topic": "news", "message": "hi"})).unwrap();
    assert_eq!(
        full.into_parts(),
        Some(("news".to_string(), "hi".to_string()))
    );

    let missing: PublishRequest = serde_json::from_value(json!({"topic": "news"})).unwrap();
    assert!(missing.into_parts().is_none());

    let null: PublishRequest =
        serde_json::from_value(json!({"topic": null, "message": "hi"})).unwrap();
    assert!(null.into_parts().is_none());

    let empty: PublishRequest =
        serde_json::from_value(json!({"topic": "news", "message": ""})).unwrap();
    assert!(empty.into_parts().is_none());
}

#[tokio::test]
async fn test_handle_publish() {
    let (broker, state) = setup();
    let mut handle = broker.subscribe("news");

    let body = json!({"topic": "news", "message": "Hello, world!"}).to_string();
    let response = send(&state, Method::POST, "/publish", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Success: topic news");

    let received = tokio::time::timeout(Duration::from_secs(1), handle.recv())
        .await
        .expect("delivery timed out")
        .expect("endpoint closed");
    assert_eq!(received.payload, "Hello, world!");
}

#[tokio::test]
async fn test_publish_without_subscribers_succeeds() {
    let (broker, state) = setup();

    let body = json!({"topic": "empty", "message": "anyone?"}).to_string();
    let response = send(&state, Method::POST, "/publish", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(!broker.has_topic("empty"));
}

#[tokio::test]
async fn test_publish_malformed_json() {
    let (_, state) = setup();

    let response = send(&state, Method::POST, "/publish", "{not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid JSON\n");

    let response = send(&state, Method::POST, "/publish", r#"{"topic": 5, "message": "x"}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_publish_rejects_non_object_bodies() {
    let (broker, state) = setup();
    let mut handle = broker.subscribe("sport");

    for body in [r#"["sport","via-array"]"#, r#""sport""#, "42", "true"] {
        let response = send(&state, Method::POST, "/publish", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(body_text(response).await, "Invalid JSON\n");
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(handle.try_recv().is_none());
}

#[tokio::test]
async fn test_publish_null_body_is_missing_fields() {
    let (_, state) = setup();

    let response = send(&state, Method::POST, "/publish", "null").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_text(response).await, "topic and message are required\n");
}

#[tokio::test]
async fn test_publish_missing_fields() {
    let (_, state) = setup();

    for body in [
        json!({"topic": "news"}),
        json!({"message": "hi"}),
        json!({"topic": "", "message": "hi"}),
        json!({"topic": "news", "message": ""}),
        json!({}),
    ] {
        let response = send(&state, Method::POST, "/publish", body.to_string()).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert_eq!(body_text(response).await, "topic and message are required\n");
    }
}

#[tokio::test]
async fn test_publish_wrong_method() {
    let (_, state) = setup();

    let response = send(&state, Method::GET, "/publish", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_text(response).await, "Method not allowed\n");
}

#[tokio::test]
async fn test_subscribe_missing_topic() {
    let (broker, state) = setup();

    for uri in ["/subscribe", "/subscribe?topic=", "/subscribe?other=1"] {
        let response = send(&state, Method::GET, uri, Body::empty()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_text(response).await, "topic is required\n");
    }
    assert_eq!(broker.topic_count(), 0);
}

#[tokio::test]
async fn test_subscribe_wrong_method() {
    let (broker, state) = setup();

    for method in [Method::POST, Method::HEAD, Method::PUT, Method::DELETE] {
        let response = send(&state, method.clone(), "/subscribe?topic=news", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert!(!broker.has_topic("news"));
    }
}

#[tokio::test]
async fn test_subscribe_streams_messages_and_unsubscribes_on_drop() {
    let (broker, state) = setup();

    let response = send(&state, Method::GET, "/subscribe?topic=sport", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
    assert_eq!(broker.subscriber_count("sport"), 1);

    let mut stream = response.into_body().into_data_stream();
    assert_eq!(
        next_chunk(&mut stream).await,
        "---Subscribed to topic sport---\n\n"
    );

    broker.publish("sport", "Score: 2-1");
    assert_eq!(next_chunk(&mut stream).await, "Message: Score: 2-1\n");

    // Client went away.
    drop(stream);
    assert!(!broker.has_topic("sport"));
}

#[tokio::test]
async fn test_close_streams_writes_closing_line() {
    let (broker, state) = setup();

    let response = send(&state, Method::GET, "/subscribe?topic=news", Body::empty()).await;
    let mut stream = response.into_body().into_data_stream();
    next_chunk(&mut stream).await;

    state.close_streams();

    assert_eq!(
        next_chunk(&mut stream).await,
        "---Unsubscribed from topic news---\n"
    );
    assert!(stream.next().await.is_none());
    assert!(!broker.has_topic("news"));
}
