//! Object store port
//!
//! Read/write of named byte blobs (form templates, question sets,
//! prompts, completed forms) keyed by a hierarchical path.

use async_trait::async_trait;
use thiserror::Error;

/// Errors an object store adapter can report
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Object store error: {0}")]
    Backend(String),
}

/// Port for artifact storage
#[async_trait]
pub trait ObjectStorePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Fetch a UTF-8 text artifact.
    async fn get_text(&self, key: &str) -> Result<String, StoreError> {
        let bytes = self.get(key).await?;
        String::from_utf8(bytes).map_err(|e| StoreError::Backend(format!("{key} is not UTF-8: {e}")))
    }
}
