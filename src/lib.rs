//! # minipub
//!
//! `minipub` is a minimal, in-process publish/subscribe broker served over
//! HTTP. Producers `POST /publish` a message for a topic; consumers hold a
//! `GET /subscribe?topic=...` response open and receive each message as a
//! line of a streamed body.
//!
//! ## Core Modules
//!
//! - `broker`: the topic registry and the non-blocking publish path.
//! - `endpoint`: a subscriber's identity and its one-slot delivery buffer.
//! - `config`: loading server settings from a file and the environment.
//! - `transport`: the HTTP server translating requests into broker calls.
//! - `utils`: the server error type and logging setup.

pub mod broker;
pub mod config;
pub mod endpoint;
pub mod transport;
pub mod utils;
