use crate::keys::url_path;
use crate::object::{client_options, list_keys, put_object};
use crate::traits::{KeyStream, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::ObjectStore;
use std::sync::Arc;
use visage_core::AccessPolicy;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    policy: AccessPolicy,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `policy` - Canned ACL sent with every write
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        policy: AccessPolicy,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone())
            .with_client_options(client_options("x-amz-acl", policy));

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store: Arc::new(store),
            bucket,
            region,
            endpoint_url,
            policy,
        })
    }

    /// Wrap an already-built store, e.g. `object_store::memory::InMemory`.
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> Self {
        S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
            policy: AccessPolicy::PublicRead,
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<String> {
        put_object(self.store.as_ref(), &self.bucket, key, content_type, data).await?;
        Ok(self.public_url(key))
    }

    async fn list(&self) -> StorageResult<KeyStream> {
        Ok(list_keys(self.store.as_ref(), &self.bucket))
    }

    /// For AWS S3: `https://{bucket}.s3.{region}.amazonaws.com/{key}`.
    /// For S3-compatible providers, path-style on the endpoint: `{endpoint}/{bucket}/{key}`.
    fn public_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, url_path(key))
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket,
                self.region,
                url_path(key)
            )
        }
    }

    fn access_policy(&self) -> AccessPolicy {
        self.policy
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
