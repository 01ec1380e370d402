/// A published message.
///
/// Messages are fire-and-forget: there is no id, timestamp or retry count.
/// The broker wraps each one in an `Arc` so every subscriber of a publish call
/// observes the same immutable value.
///
/// # Example
///
/// ```rust
/// use minipub::broker::message::Message;
///
/// let msg = Message::new("sport", "Score: 2-1");
/// assert_eq!(msg.topic, "sport");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub topic: String,
    pub payload: String,
}

impl Message {
    pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}
