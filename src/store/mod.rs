//! Resource storage
//!
//! The server reads response bodies through the [`FileStore`] trait so
//! connection handling can be exercised without touching the disk.

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

/// Bytes of a resource plus its modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub bytes: Vec<u8>,
    pub last_modified: SystemTime,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The path points outside the store's root.
    #[error("path not allowed: {0}")]
    Forbidden(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Source of resource bytes, keyed by a path relative to the document root.
pub trait FileStore: Send + Sync + 'static {
    fn read(&self, path: &str) -> impl Future<Output = Result<Resource, StoreError>> + Send;
}

/// Serves files from a directory on disk.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `path` onto the root, refusing anything that could climb out of it.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(path);
        let mut resolved = self.root.clone();

        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return Err(StoreError::Forbidden(path.to_string())),
            }
        }

        Ok(resolved)
    }
}

impl FileStore for DiskStore {
    async fn read(&self, path: &str) -> Result<Resource, StoreError> {
        let full = self.resolve(path)?;

        let io_err = |source: std::io::Error| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(path.to_string())
            } else {
                StoreError::Io { path: path.to_string(), source }
            }
        };

        let metadata = tokio::fs::metadata(&full).await.map_err(io_err)?;
        if !metadata.is_file() {
            return Err(StoreError::NotFound(path.to_string()));
        }

        let bytes = tokio::fs::read(&full).await.map_err(io_err)?;
        let last_modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        tracing::debug!(path = %full.display(), bytes = bytes.len(), "Read resource");

        Ok(Resource { bytes, last_modified })
    }
}
