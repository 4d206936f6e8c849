//! Turnstile - a minimal HTTP/1.1 server with bounded admission
//!
//! Core library for request validation, connection admission and serving.

pub mod admission;
pub mod config;
pub mod http;
pub mod server;
pub mod store;
