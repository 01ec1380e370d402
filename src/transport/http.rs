//! HTTP transport
//!
//! Translates HTTP requests into broker calls:
//! - `POST /publish` with a JSON body `{"topic": ..., "message": ...}`
//! - `GET /subscribe?topic=...` answered with a long-lived `text/event-stream`
//!   body fed from the subscriber's endpoint
//!
//! The request body of `/publish` is parsed by hand rather than through the
//! `Json` extractor so that the content type is not enforced and parse
//! failures map to the statuses the API promises. Only a JSON object (or
//! `null`, read as an empty request) is accepted as a publish body.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, CONNECTION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tokio::sync::watch;
use tracing::debug;

use crate::broker::Broker;
use crate::transport::error::ApiError;
use crate::transport::message::{PublishRequest, SubscribeParams};
use crate::transport::stream::subscription_stream;

/// Shared state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub broker: Arc<Broker>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl AppState {
    pub fn new(broker: Arc<Broker>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            broker,
            shutdown: Arc::new(shutdown),
        }
    }

    /// Tell every open subscription stream to write its closing line and end.
    pub fn close_streams(&self) {
        self.shutdown.send_replace(true);
    }

    fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/publish", post(publish).fallback(method_not_allowed))
        // axum answers HEAD with the GET handler unless HEAD has its own route.
        .route(
            "/subscribe",
            get(subscribe)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}

async fn publish(State(state): State<AppState>, body: Bytes) -> Result<String, ApiError> {
    let request = PublishRequest::from_body(&body).inspect_err(|err| {
        debug!("Rejected publish body: {err:?}");
    })?;
    let (topic, message) = request
        .into_parts()
        .ok_or(ApiError::MissingPublishFields)?;

    state.broker.publish(&topic, message);

    Ok(format!("Success: topic {topic}"))
}

async fn subscribe(
    State(state): State<AppState>,
    Query(params): Query<SubscribeParams>,
) -> Result<Response, ApiError> {
    let topic = params.into_topic().ok_or(ApiError::MissingTopic)?;

    let lines = subscription_stream(state.broker.clone(), &topic, state.shutdown_signal());

    Ok((
        [
            (CONTENT_TYPE, "text/event-stream"),
            (CACHE_CONTROL, "no-cache"),
            (CONNECTION, "keep-alive"),
        ],
        Body::from_stream(lines),
    )
        .into_response())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
