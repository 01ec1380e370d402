use serde::Deserialize;
use serde_json::Value;

use crate::transport::error::ApiError;

/// Body of `POST /publish`.
///
/// Both fields are optional at the JSON level so that a missing or `null`
/// field is a validation failure (422) rather than a parse failure (400).
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PublishRequest {
    pub topic: Option<String>,
    pub message: Option<String>,
}

impl PublishRequest {
    /// Parse a request body. Only a JSON object is a request; `null` counts as
    /// an empty one, anything else is rejected.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        match serde_json::from_slice(body).map_err(ApiError::InvalidJson)? {
            Value::Null => Ok(Self::default()),
            value @ Value::Object(_) => {
                serde_json::from_value(value).map_err(ApiError::InvalidJson)
            }
            _ => Err(ApiError::NotAnObject),
        }
    }

    /// Topic and message, if both are present and non-empty.
    pub fn into_parts(self) -> Option<(String, String)> {
        match (self.topic, self.message) {
            (Some(topic), Some(message)) if !topic.is_empty() && !message.is_empty() => {
                Some((topic, message))
            }
            _ => None,
        }
    }
}

/// Query string of `GET /subscribe`.
#[derive(Debug, Default, Deserialize)]
pub struct SubscribeParams {
    pub topic: Option<String>,
}

impl SubscribeParams {
    pub fn into_topic(self) -> Option<String> {
        self.topic.filter(|topic| !topic.is_empty())
    }
}
