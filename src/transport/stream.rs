//! Subscriber response streams
//!
//! A subscription stream registers an endpoint when it is created and yields
//! the lines of a `GET /subscribe` response body: a greeting, then one line
//! per delivered message. It waits only on its own endpoint buffer or on the
//! server's shutdown signal.
//!
//! The endpoint is unsubscribed when the stream is dropped. hyper drops the
//! body when the client disconnects, and the stream drops itself after the
//! closing line on shutdown, so every exit path deregisters exactly once.

use std::convert::Infallible;
use std::sync::Arc;

use futures_util::Stream;
use futures_util::stream;
use tokio::sync::watch;
use tracing::debug;

use crate::broker::Broker;
use crate::endpoint::EndpointHandle;

pub fn subscribed_line(topic: &str) -> String {
    format!("---Subscribed to topic {topic}---\n\n")
}

pub fn message_line(payload: &str) -> String {
    format!("Message: {payload}\n")
}

pub fn unsubscribed_line(topic: &str) -> String {
    format!("---Unsubscribed from topic {topic}---\n")
}

/// Keeps an endpoint registered for as long as it is alive.
struct Subscription {
    broker: Arc<Broker>,
    handle: EndpointHandle,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.broker
            .unsubscribe(self.handle.topic(), self.handle.id());
        debug!(
            topic = self.handle.topic(),
            subscriber = %self.handle.id(),
            "Subscription stream closed"
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Greeting,
    Live,
    Done,
}

struct Feed {
    subscription: Subscription,
    shutdown: watch::Receiver<bool>,
    phase: Phase,
}

impl Feed {
    async fn next_line(&mut self) -> Option<String> {
        match self.phase {
            Phase::Greeting => {
                self.phase = Phase::Live;
                Some(subscribed_line(self.subscription.handle.topic()))
            }
            Phase::Live => {
                let delivered = tokio::select! {
                    message = self.subscription.handle.recv() => message,
                    _ = self.shutdown.wait_for(|closed| *closed) => None,
                };

                match delivered {
                    Some(message) => Some(message_line(&message.payload)),
                    None => {
                        self.phase = Phase::Done;
                        Some(unsubscribed_line(self.subscription.handle.topic()))
                    }
                }
            }
            Phase::Done => None,
        }
    }
}

/// Subscribe to `topic` and return the response body lines for it.
///
/// The stream ends after the closing line once `shutdown` flips to `true`
/// (or its sender goes away).
pub fn subscription_stream(
    broker: Arc<Broker>,
    topic: &str,
    shutdown: watch::Receiver<bool>,
) -> impl Stream<Item = Result<String, Infallible>> + Send + 'static {
    let handle = broker.subscribe(topic);
    let feed = Feed {
        subscription: Subscription { broker, handle },
        shutdown,
        phase: Phase::Greeting,
    };

    stream::unfold(feed, |mut feed| async move {
        let line = feed.next_line().await?;
        Some((Ok(line), feed))
    })
}
