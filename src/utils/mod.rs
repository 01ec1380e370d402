//! Shared utilities: the server error type and logging setup.

pub mod error;
pub mod logging;
