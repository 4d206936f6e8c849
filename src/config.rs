use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

/// Runtime configuration.
///
/// Loaded from an optional YAML file, then overridden by the `LISTEN`
/// environment variable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub static_files: StaticFilesConfig,
    #[serde(default)]
    pub admission: AdmissionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// Directory resources are served from.
    #[serde(default = "default_root")]
    pub root: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdmissionConfig {
    /// Connections beyond this many concurrently live ones get 503.
    #[serde(default = "default_max_live_connections")]
    pub max_live_connections: usize,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_root() -> String {
    ".".to_string()
}

fn default_max_live_connections() -> usize {
    crate::admission::DEFAULT_MAX_LIVE
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { listen_addr: default_listen_addr() }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self { root: default_root() }
    }
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self { max_live_connections: default_max_live_connections() }
    }
}

impl Config {
    /// Loads the configuration named by `TURNSTILE_CONFIG` (if any) and
    /// applies the `LISTEN` override.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("TURNSTILE_CONFIG").ok();
        let listen = std::env::var("LISTEN").ok();
        Self::load_from(path.as_deref().map(Path::new), listen)
    }

    pub fn load_from(path: Option<&Path>, listen: Option<String>) -> anyhow::Result<Self> {
        let mut cfg = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                Self::from_yaml(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Some(addr) = listen {
            cfg.server.listen_addr = addr;
        }

        Ok(cfg)
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(text)?;
        if cfg.admission.max_live_connections == 0 {
            anyhow::bail!("admission.max_live_connections must be at least 1");
        }
        Ok(cfg)
    }

    /// Replaces the port of the listen address, keeping its host.
    pub fn with_port(mut self, port: u16) -> Self {
        let host = match self.server.listen_addr.rsplit_once(':') {
            Some((host, _)) => host.to_string(),
            None => self.server.listen_addr.clone(),
        };
        self.server.listen_addr = format!("{}:{}", host, port);
        self
    }
}
