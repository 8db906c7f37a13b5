//! Blob store access
//!
//! The object store is a plain key/value blob store. Detection records are
//! fetched from it as JSON; the upload and export surfaces write blobs
//! back. Everything goes through the [`BlobStore`] trait so the pipeline
//! is testable against the in-memory implementation.

use crate::error::{IngestError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Blob store contract: get and put by key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Bytes>;
    async fn put(&self, key: &str, data: Bytes) -> Result<()>;
}

/// HTTP blob store client configuration.
#[derive(Debug, Clone)]
pub struct HttpBlobStoreConfig {
    /// Base URL of the S3-compatible gateway, without trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for HttpBlobStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Blob store client speaking plain HTTP GET/PUT against an
/// S3-compatible gateway.
pub struct HttpBlobStore {
    config: HttpBlobStoreConfig,
    client: Client,
}

impl HttpBlobStore {
    pub fn new(config: HttpBlobStoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IngestError::Internal(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn get(&self, key: &str) -> Result<Bytes> {
        debug!("Fetching blob {}", key);

        let response = self
            .client
            .get(self.url(key))
            .send()
            .await
            .map_err(|e| IngestError::UpstreamFetchFailure {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(IngestError::NotFound(key.to_string()));
        }
        if !response.status().is_success() {
            return Err(IngestError::UpstreamFetchFailure {
                key: key.to_string(),
                reason: format!("status {}", response.status()),
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| IngestError::UpstreamFetchFailure {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        debug!("Storing blob {} ({} bytes)", key, data.len());

        let response = self
            .client
            .put(self.url(key))
            .body(data)
            .send()
            .await
            .map_err(|e| IngestError::UpstreamFetchFailure {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(IngestError::UpstreamFetchFailure {
                key: key.to_string(),
                reason: format!("status {}", response.status()),
            });
        }
        Ok(())
    }
}

/// In-memory blob store used by tests and local runs.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Bytes> {
        self.blobs
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| IngestError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        self.blobs.write().await.insert(key.to_string(), data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryBlobStore::new();
        store
            .put("images/a.jpg", Bytes::from_static(b"data"))
            .await
            .unwrap();
        let data = store.get("images/a.jpg").await.unwrap();
        assert_eq!(&data[..], b"data");
    }

    #[tokio::test]
    async fn test_memory_store_missing_key() {
        let store = MemoryBlobStore::new();
        let err = store.get("nope").await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn test_http_store_url_building() {
        let store = HttpBlobStore::new(HttpBlobStoreConfig {
            base_url: "http://localhost:9000/".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(store.url("images/a.jpg"), "http://localhost:9000/images/a.jpg");
    }
}
