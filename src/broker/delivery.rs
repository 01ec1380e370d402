//! Delivery engine
//!
//! Hands one published message to every endpoint of a snapshot. Each attempt
//! is a `try_send` on the endpoint's one-slot buffer: it either lands right
//! away or is abandoned. A full buffer means the consumer has not drained the
//! previous message yet, and the new one is dropped for that endpoint only.
//!
//! Inside a tokio runtime every attempt is spawned as its own task and the
//! publisher never observes the outcome. Without a runtime the attempts run
//! inline, one after another; none of them can wait.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::broker::message::Message;
use crate::endpoint::Endpoint;

/// Result of a single delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The message is in the endpoint's buffer.
    Delivered,
    /// The buffer already held an undelivered message.
    Dropped,
    /// The consumer is gone; the endpoint was detached mid-publish.
    Detached,
}

/// Try to place `message` into `endpoint`'s buffer without waiting.
pub fn attempt(endpoint: &Endpoint, message: Arc<Message>) -> Delivery {
    let outcome = match endpoint.sender.try_send(message.clone()) {
        Ok(()) => Delivery::Delivered,
        Err(TrySendError::Full(_)) => Delivery::Dropped,
        Err(TrySendError::Closed(_)) => Delivery::Detached,
    };

    match outcome {
        Delivery::Delivered => {}
        Delivery::Dropped => warn!(
            topic = %message.topic,
            subscriber = %endpoint.id,
            "Subscriber buffer full, message dropped"
        ),
        Delivery::Detached => debug!(
            topic = %message.topic,
            subscriber = %endpoint.id,
            "Subscriber detached before delivery"
        ),
    }

    outcome
}

/// Deliver `message` to every endpoint in `targets` independently.
pub fn fan_out(targets: Vec<Endpoint>, message: Arc<Message>) {
    match Handle::try_current() {
        Ok(runtime) => {
            for endpoint in targets {
                let message = Arc::clone(&message);
                runtime.spawn(async move {
                    attempt(&endpoint, message);
                });
            }
        }
        Err(_) => {
            for endpoint in &targets {
                attempt(endpoint, Arc::clone(&message));
            }
        }
    }
}
