//! Broker engine
//!
//! The in-memory broker responsible for:
//! - keeping the registry of topics and their subscriber endpoints
//! - creating endpoints on subscribe and dropping empty topics on unsubscribe
//! - publishing a message to a snapshot of a topic's subscribers
//!
//! Concurrency and usage notes:
//! - The whole registry sits behind one `RwLock`. Subscribe and unsubscribe
//!   take the write lock; publish and the read-only accessors take the read
//!   lock. Share the broker as `Arc<Broker>`; no outer lock is needed.
//! - Publish clones the endpoint senders under the read lock and delivers
//!   after releasing it, so a slow consumer never holds up the registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::broker::delivery;
use crate::broker::message::Message;
use crate::broker::topic::Topic;
use crate::endpoint::{Endpoint, EndpointHandle, SubscriberId};

#[derive(Debug, Default)]
pub struct Broker {
    topics: RwLock<HashMap<String, Topic>>,
}

impl Broker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new endpoint for `topic`, creating the topic if needed.
    ///
    /// The returned handle receives the topic's messages and identifies the
    /// endpoint for `unsubscribe`.
    pub fn subscribe(&self, topic: &str) -> EndpointHandle {
        let (endpoint, handle) = Endpoint::pair(topic);

        let mut topics = self.write();
        let entry = topics
            .entry(topic.to_string())
            .or_insert_with(|| Topic::new(topic));
        entry.subscribe(endpoint);

        info!(
            topic,
            subscriber = %handle.id(),
            subscribers = entry.len(),
            "Subscribed"
        );

        handle
    }

    /// Remove endpoint `id` from `topic`.
    ///
    /// Unknown topics and ids are ignored, so calling this twice is harmless.
    /// The topic itself is dropped when its last endpoint goes.
    pub fn unsubscribe(&self, topic: &str, id: &SubscriberId) {
        let mut topics = self.write();

        let Some(entry) = topics.get_mut(topic) else {
            debug!(topic, subscriber = %id, "Unsubscribe for unknown topic ignored");
            return;
        };

        if !entry.unsubscribe(id) {
            debug!(topic, subscriber = %id, "Unsubscribe for unknown subscriber ignored");
            return;
        }

        let remaining = entry.len();
        if entry.is_empty() {
            topics.remove(topic);
        }

        info!(topic, subscriber = %id, subscribers = remaining, "Unsubscribed");
    }

    /// Publish `payload` to every current subscriber of `topic`.
    ///
    /// Publishing to a topic nobody listens to is a no-op. Delivery never
    /// waits: a subscriber whose buffer is still full misses this message.
    pub fn publish(&self, topic: &str, payload: impl Into<String>) {
        let targets = match self.read().get(topic) {
            Some(entry) => entry.snapshot(),
            None => {
                debug!(topic, "No subscribers, publish skipped");
                return;
            }
        };

        debug!(topic, subscribers = targets.len(), "Publishing");
        delivery::fan_out(targets, Arc::new(Message::new(topic, payload)));
    }

    /// Number of endpoints currently registered for `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.read().get(topic).map_or(0, Topic::len)
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.read().contains_key(topic)
    }

    pub fn topic_count(&self) -> usize {
        self.read().len()
    }

    /// Names of all topics with at least one subscriber, sorted.
    pub fn topics(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    // A poisoned lock means a panic while the registry was being mutated;
    // there is no consistent state to recover.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Topic>> {
        self.topics.read().expect("subscription registry lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Topic>> {
        self.topics
            .write()
            .expect("subscription registry lock poisoned")
    }
}
