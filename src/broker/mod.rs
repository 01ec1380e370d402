//! The `broker` module is the core of the system.
//!
//! - `engine`: the `Broker`, owning the topic registry and the publish path.
//! - `topic`: one registry entry, the ordered endpoints of a topic.
//! - `delivery`: non-blocking, per-endpoint fan-out of a published message.
//! - `message`: the immutable message value handed to subscribers.

pub mod delivery;
pub mod engine;
pub mod message;
pub mod topic;

pub use engine::Broker;
