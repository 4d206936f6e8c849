//! Registry of accepted connections
//!
//! Membership is append-only: entries are never removed, only moved from
//! `Live` to `Dead`. Live counts are always recomputed by scanning.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use super::DEFAULT_MAX_LIVE;

/// Sequence number assigned at accept time. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a connection. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Live,
    Dead,
}

/// One registered connection.
#[derive(Debug, Clone)]
pub struct ConnectionEntry {
    pub id: ConnectionId,
    pub state: ConnectionState,
    pub accepted_at: Instant,
}

impl ConnectionEntry {
    fn new(id: ConnectionId) -> Self {
        Self {
            id,
            state: ConnectionState::Live,
            accepted_at: Instant::now(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.state == ConnectionState::Live
    }
}

/// Shared handle to the process-wide connection registry.
///
/// Cloning is cheap; all clones see the same entries.
#[derive(Debug, Clone)]
pub struct ConnectionRegistry {
    entries: Arc<RwLock<Vec<ConnectionEntry>>>,
    max_live: usize,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LIVE)
    }
}

impl ConnectionRegistry {
    pub fn new(max_live: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            max_live,
        }
    }

    pub fn max_live(&self) -> usize {
        self.max_live
    }

    /// Appends a new live connection and returns its sequence number.
    ///
    /// Numbers start at 1 and follow registration order.
    pub async fn register(&self) -> ConnectionId {
        let mut entries = self.entries.write().await;
        let id = ConnectionId(entries.len() as u64 + 1);
        entries.push(ConnectionEntry::new(id));
        id
    }

    /// Moves a connection to `Dead`. Unknown or already dead ids are ignored.
    pub async fn mark_dead(&self, id: ConnectionId) {
        let mut entries = self.entries.write().await;

        if let Some(entry) = entries.iter_mut().find(|e| e.id == id) {
            if entry.is_live() {
                entry.state = ConnectionState::Dead;
                tracing::debug!(connection = %id, "Connection marked dead");
            }
        }
    }

    /// Number of connections live right now.
    pub async fn count_live(&self) -> usize {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.is_live())
            .count()
    }

    /// Whether `id` is live and among the first `max_live` live connections
    /// in registration order.
    pub async fn is_admitted(&self, id: ConnectionId) -> bool {
        let entries = self.entries.read().await;
        let mut live = 0;

        for entry in entries.iter() {
            if entry.is_live() {
                live += 1;
            }
            if entry.id == id {
                return entry.is_live() && live <= self.max_live;
            }
            if live >= self.max_live {
                // Every later live entry is already past the ceiling.
                break;
            }
        }

        false
    }

    pub async fn state(&self, id: ConnectionId) -> Option<ConnectionState> {
        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.state)
    }

    /// Snapshot of all entries (for monitoring/debugging).
    pub async fn entries(&self) -> Vec<ConnectionEntry> {
        self.entries.read().await.clone()
    }
}
