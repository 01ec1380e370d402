//! The `error` module defines the errors that can stop the server.
//!
//! Request-level failures never reach this type; the transport maps them to
//! HTTP statuses on its own (see `transport::error`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
