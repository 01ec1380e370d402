//! The `endpoint` module defines a subscriber's delivery target.
//!
//! Each subscribe call creates a fresh pair: an `Endpoint` (the sending half,
//! owned by the registry entry for its topic) and an `EndpointHandle` (the
//! receiving half, owned by the consumer). The two share a one-slot buffer.

pub mod subscriber;
pub use subscriber::{BUFFER_CAPACITY, Endpoint, EndpointHandle, SubscriberId};
