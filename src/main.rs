use turnstile::config::Config;
use turnstile::server::Server;
use turnstile::store::DiskStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let mut cfg = Config::load()?;

    // Optional positional port, e.g. `turnstile 8081`.
    if let Some(arg) = std::env::args().nth(1) {
        let port: u16 = arg
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid port: {}", arg))?;
        cfg = cfg.with_port(port);
    }

    tracing::info!("Server starting...");

    let store = DiskStore::new(&cfg.static_files.root);
    let server = Server::bind(&cfg, store).await?;

    tokio::select! {
        res = server.run() => {
            if let Err(e) = &res {
                tracing::error!("Server stopped: {:#}", e);
            }
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
