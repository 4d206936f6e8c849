//! Connection admission
//!
//! Tracks every accepted connection and decides which of them are served.
//! Only the first `max_live` concurrently live connections (in accept order)
//! are admitted; the rest get 503 on every request until capacity frees up.

pub mod registry;

pub use registry::{ConnectionEntry, ConnectionId, ConnectionRegistry, ConnectionState};

/// Default admission ceiling.
pub const DEFAULT_MAX_LIVE: usize = 5;
