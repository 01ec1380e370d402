//! Request errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Invalid JSON")]
    NotAnObject,

    #[error("topic and message are required")]
    MissingPublishFields,

    #[error("topic is required")]
    MissingTopic,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidJson(_) | ApiError::NotAnObject | ApiError::MissingTopic => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MissingPublishFields => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), format!("{self}\n")).into_response()
    }
}
