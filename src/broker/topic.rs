//! Topic management
//!
//! A `Topic` is the registry entry for one topic name: the endpoints
//! subscribed to it, in append order. Removal is a linear scan-and-splice,
//! which is fine for the handful of subscribers a topic usually has.
//!
//! Callers must synchronize access to `Topic` through the broker lock.

use crate::endpoint::{Endpoint, SubscriberId};

#[derive(Debug, Default)]
pub struct Topic {
    pub name: String,
    pub subscribers: Vec<Endpoint>,
}

impl Topic {
    /// Create a new topic with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: Vec::new(),
        }
    }

    /// Append an endpoint. Endpoint ids are fresh UUIDs, so the same id never
    /// lands here twice.
    pub fn subscribe(&mut self, endpoint: Endpoint) {
        debug_assert!(!self.contains(&endpoint.id));
        self.subscribers.push(endpoint);
    }

    /// Remove the endpoint with `id`. Returns whether it was present.
    pub fn unsubscribe(&mut self, id: &SubscriberId) -> bool {
        match self.subscribers.iter().position(|e| &e.id == id) {
            Some(index) => {
                self.subscribers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &SubscriberId) -> bool {
        self.subscribers.iter().any(|e| &e.id == id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Clone the current endpoints so delivery can run without the lock.
    pub fn snapshot(&self) -> Vec<Endpoint> {
        self.subscribers.clone()
    }
}
