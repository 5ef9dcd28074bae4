use crate::keys::url_path;
use crate::object::{client_options, list_keys, put_object};
use crate::traits::{KeyStream, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::ObjectStore;
use std::sync::Arc;
use visage_core::constants::GCS_PUBLIC_HOST;
use visage_core::AccessPolicy;

/// Google Cloud Storage implementation
#[derive(Clone)]
pub struct GcsStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    policy: AccessPolicy,
}

impl GcsStorage {
    /// Create a new GcsStorage instance
    ///
    /// Credentials are resolved by object_store from the environment
    /// (`GOOGLE_SERVICE_ACCOUNT`, `GOOGLE_APPLICATION_CREDENTIALS` or the
    /// metadata server).
    pub fn new(bucket: String, policy: AccessPolicy) -> StorageResult<Self> {
        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket.clone())
            .with_client_options(client_options("x-goog-acl", policy))
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(GcsStorage {
            store: Arc::new(store),
            bucket,
            policy,
        })
    }

    /// Wrap an already-built store, e.g. `object_store::memory::InMemory`.
    pub fn with_store(store: Arc<dyn ObjectStore>, bucket: String, policy: AccessPolicy) -> Self {
        GcsStorage {
            store,
            bucket,
            policy,
        }
    }
}

#[async_trait]
impl Storage for GcsStorage {
    async fn upload(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<String> {
        put_object(self.store.as_ref(), &self.bucket, key, content_type, data).await?;
        Ok(self.public_url(key))
    }

    async fn list(&self) -> StorageResult<KeyStream> {
        Ok(list_keys(self.store.as_ref(), &self.bucket))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", GCS_PUBLIC_HOST, self.bucket, url_path(key))
    }

    /// `gs://` URIs name the object verbatim.
    fn analysis_uri(&self, key: &str) -> String {
        format!("gs://{}/{}", self.bucket, key)
    }

    fn access_policy(&self) -> AccessPolicy {
        self.policy
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Gcs
    }
}
