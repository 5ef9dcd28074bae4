//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use thiserror::Error;
use visage_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Lazily produced object keys. Each call to [`Storage::list`] starts a fresh listing.
pub type KeyStream = BoxStream<'static, StorageResult<String>>;

impl StorageError {
    /// Map a failed write to the pipeline's storage-write error.
    pub fn into_write_error(self) -> AppError {
        match self {
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::StorageWrite(other.to_string()),
        }
    }

    /// Map a failed listing to the gallery's storage-list error.
    pub fn into_list_error(self) -> AppError {
        AppError::StorageList(self.to_string())
    }
}

/// Storage abstraction trait
///
/// All storage backends (GCS, S3, local filesystem) implement this trait so the
/// pipeline and the gallery work against any of them, or against a fake in tests.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` under `key` in a single non-resumable put and return the public URL.
    ///
    /// An existing object with the same key is overwritten.
    async fn upload(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<String>;

    /// List every object key in the bucket.
    ///
    /// The stream is finite and lazy; failures surface as stream items.
    async fn list(&self) -> StorageResult<KeyStream>;

    /// Deterministic public URL for `key`. Pure function of bucket identity and key.
    fn public_url(&self, key: &str) -> String;

    /// Reference handed to the vision service for `key`.
    ///
    /// Defaults to the public URL; GCS uses a `gs://` URI.
    fn analysis_uri(&self, key: &str) -> String {
        self.public_url(key)
    }

    /// Access policy applied to every written object.
    fn access_policy(&self) -> visage_core::AccessPolicy;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_mapping() {
        let err = StorageError::UploadFailed("connection reset".to_string()).into_write_error();
        assert_eq!(
            err.to_string(),
            "Could not upload image: Upload failed: connection reset"
        );

        let err = StorageError::InvalidKey("../x".to_string()).into_write_error();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_list_error_mapping() {
        let err = StorageError::ListFailed("denied".to_string()).into_list_error();
        assert!(matches!(err, AppError::StorageList(_)));
    }
}
