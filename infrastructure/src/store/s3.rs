//! S3 object store adapter

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;
use formpilot_application::{ObjectStorePort, StoreError};
use std::sync::Arc;
use tracing::debug;

/// Artifact storage in one S3 bucket, keyed by hierarchical path
pub struct S3ObjectStore {
    client: Arc<S3Client>,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(sdk_config: &aws_config::SdkConfig, bucket: impl Into<String>) -> Self {
        Self {
            client: Arc::new(S3Client::new(sdk_config)),
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStorePort for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        debug!(bucket = %self.bucket, key, "S3 get");
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    StoreError::NotFound(format!("s3://{}/{key}", self.bucket))
                } else {
                    StoreError::Backend(format!("S3 get failed for {key}: {service_err}"))
                }
            })?;

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Backend(format!("S3 body read failed for {key}: {e}")))?;
        Ok(bytes.into_bytes().to_vec())
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        debug!(bucket = %self.bucket, key, size = bytes.len(), "S3 put");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("S3 put failed for {key}: {e}")))?;
        Ok(())
    }
}
