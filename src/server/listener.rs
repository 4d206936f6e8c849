use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::admission::ConnectionRegistry;
use crate::config::Config;
use crate::http::connection::ConnectionHandler;
use crate::store::FileStore;

/// Accepts connections and spawns one handler task per connection.
///
/// Connections over the admission ceiling are still accepted; their
/// handlers answer 503 until capacity frees up.
pub struct Server<S> {
    listener: TcpListener,
    registry: ConnectionRegistry,
    store: Arc<S>,
}

impl<S: FileStore> Server<S> {
    pub async fn bind(cfg: &Config, store: S) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(&cfg.server.listen_addr)
            .await
            .with_context(|| format!("binding {}", cfg.server.listen_addr))?;

        Ok(Self {
            listener,
            registry: ConnectionRegistry::new(cfg.admission.max_live_connections),
            store: Arc::new(store),
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Runs the accept loop. Only returns if accepting fails.
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.local_addr()?;
        info!(
            "Listening on {} (max {} live connections)",
            addr,
            self.registry.max_live()
        );

        loop {
            let (socket, peer) = self.listener.accept().await.context("accepting connection")?;

            let mut conn =
                ConnectionHandler::register(socket, self.registry.clone(), self.store.clone()).await;
            info!(connection = %conn.id(), "Accepted connection from {}", peer);

            tokio::spawn(async move {
                if let Err(e) = conn.run().await {
                    tracing::error!(connection = %conn.id(), "Connection error from {}: {:#}", peer, e);
                }
            });
        }
    }
}
