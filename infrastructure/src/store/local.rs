//! Local-directory object store adapter

use async_trait::async_trait;
use formpilot_application::{ObjectStorePort, StoreError};
use std::path::PathBuf;
use tracing::debug;

/// Artifact storage under a local root directory, keyed by relative path
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl ObjectStorePort for LocalObjectStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(key);
        debug!(path = %path.display(), "Local store get");
        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(path.display().to_string())
            } else {
                StoreError::Backend(format!("Read failed for {}: {e}", path.display()))
            }
        })
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.resolve(key);
        debug!(path = %path.display(), size = bytes.len(), "Local store put");
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::Backend(format!("Create dir failed for {}: {e}", parent.display()))
            })?;
        }
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            StoreError::Backend(format!("Write failed for {}: {e}", path.display()))
        })
    }
}
