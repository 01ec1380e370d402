//! The `transport` module exposes the broker over HTTP.
//!
//! It defines the request shapes, maps request errors to statuses, turns a
//! subscriber endpoint into a streamed response body, and runs the server.

pub mod error;
pub mod http;
pub mod message;
pub mod server;
pub mod stream;

pub use http::{AppState, router};
pub use server::{serve, start_http_server};

#[cfg(test)]
mod tests;
