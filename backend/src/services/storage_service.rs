//! Object-storage client for profile avatars.

use crate::config::StorageConfig;
use crate::errors::{ServiceError, ServiceResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Blob store consumed by profile management.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `file_data` under `file_name`, overwriting any previous object.
    async fn upload_file(&self, file_name: &str, file_data: Vec<u8>) -> ServiceResult<()>;

    /// Resolves the public URL for a stored object.
    async fn get_file_url(&self, file_name: &str) -> ServiceResult<String>;
}

/// HTTP object-store adapter (S3-compatible path-style endpoints).
#[derive(Debug, Clone)]
pub struct HttpObjectStorage {
    http_client: Client,
    config: StorageConfig,
}

impl HttpObjectStorage {
    pub fn new(config: StorageConfig) -> ServiceResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                ServiceError::external_service(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn object_url(&self, file_name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.bucket,
            file_name
        )
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn upload_file(&self, file_name: &str, file_data: Vec<u8>) -> ServiceResult<()> {
        let url = self.object_url(file_name);

        let response = self
            .http_client
            .put(&url)
            .body(file_data)
            .send()
            .await
            .map_err(|e| ServiceError::external_service(format!("Upload failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ServiceError::external_service(format!(
                "Upload failed with status {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn get_file_url(&self, file_name: &str) -> ServiceResult<String> {
        Ok(self.object_url(file_name))
    }
}
