use std::sync::Arc;

use tokio::sync::mpsc::{self, Receiver, Sender, error::TryRecvError};
use uuid::Uuid;

use crate::broker::message::Message;

pub type SubscriberId = String;

/// Number of undelivered messages an endpoint can hold.
pub const BUFFER_CAPACITY: usize = 1;

/// Registry-side half of a subscriber.
///
/// Cloning an `Endpoint` clones the sender, so a delivery task can outlive the
/// registry entry it was snapshotted from.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Unique identifier, shared with the matching `EndpointHandle`.
    pub id: SubscriberId,

    pub(crate) sender: Sender<Arc<Message>>,
}

/// Consumer-side half of a subscriber.
#[derive(Debug)]
pub struct EndpointHandle {
    id: SubscriberId,
    topic: String,
    receiver: Receiver<Arc<Message>>,
}

impl Endpoint {
    /// Create a connected endpoint pair for `topic`. The id is a fresh UUID, so
    /// two subscribe calls never share an identity.
    pub fn pair(topic: &str) -> (Endpoint, EndpointHandle) {
        let id = Uuid::new_v4().to_string();
        let (sender, receiver) = mpsc::channel(BUFFER_CAPACITY);

        let endpoint = Endpoint {
            id: id.clone(),
            sender,
        };
        let handle = EndpointHandle {
            id,
            topic: topic.to_string(),
            receiver,
        };

        (endpoint, handle)
    }

    /// True once the consumer has dropped its handle.
    pub fn is_detached(&self) -> bool {
        self.sender.is_closed()
    }
}

impl EndpointHandle {
    pub fn id(&self) -> &SubscriberId {
        &self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Wait for the next delivered message.
    ///
    /// Returns `None` once the endpoint has been removed from the registry and
    /// every in-flight delivery has finished.
    pub async fn recv(&mut self) -> Option<Arc<Message>> {
        self.receiver.recv().await
    }

    /// Take the pending message, if any, without waiting.
    pub fn try_recv(&mut self) -> Option<Arc<Message>> {
        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Number of messages waiting in the buffer (0 or 1).
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}
