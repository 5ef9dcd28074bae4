//! Helpers shared by the object_store-backed cloud backends.

use crate::traits::{KeyStream, StorageError, StorageResult};
use bytes::Bytes;
use futures::StreamExt;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use object_store::path::Path;
use object_store::{
    Attribute, AttributeValue, Attributes, ClientOptions, ObjectStore, PutOptions, PutPayload,
};
use visage_core::AccessPolicy;

/// Client options carrying the canned ACL header for `policy`.
///
/// object_store has no per-request ACL, so the header is sent on every request
/// made by the client.
pub(crate) fn client_options(acl_header: &'static str, policy: AccessPolicy) -> ClientOptions {
    let mut options = ClientOptions::new();
    if let Some(acl) = policy.canned_acl() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(acl_header),
            HeaderValue::from_static(acl),
        );
        options = options.with_default_headers(headers);
    }
    options
}

/// Location for `key`, stored exactly as given.
///
/// `Path::from` would percent-encode or drop parts of the name, leaving the
/// object under a key nobody asked for; such keys are rejected instead.
pub(crate) fn object_path(key: &str) -> StorageResult<Path> {
    let location = Path::parse(key)
        .map_err(|e| StorageError::InvalidKey(format!("'{}': {}", key, e)))?;
    if location.as_ref() != key {
        return Err(StorageError::InvalidKey(format!(
            "'{}' would be stored as '{}'",
            key, location
        )));
    }
    Ok(location)
}

/// Single put of `data` under `key` with the declared content type.
pub(crate) async fn put_object(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    content_type: &str,
    data: Bytes,
) -> StorageResult<()> {
    let size = data.len() as u64;
    let location = object_path(key)?;
    let start = std::time::Instant::now();

    let mut attributes = Attributes::new();
    attributes.insert(
        Attribute::ContentType,
        AttributeValue::from(content_type.to_string()),
    );
    let opts = PutOptions {
        attributes,
        ..Default::default()
    };

    store
        .put_opts(&location, PutPayload::from(data), opts)
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Object upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

    tracing::info!(
        bucket = %bucket,
        key = %key,
        size_bytes = size,
        content_type = %content_type,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Object upload successful"
    );

    Ok(())
}

/// Lazy listing of every key in the store.
pub(crate) fn list_keys(store: &dyn ObjectStore, bucket: &str) -> KeyStream {
    let bucket = bucket.to_string();
    store
        .list(None)
        .map(move |res| match res {
            Ok(meta) => Ok(meta.location.to_string()),
            Err(e) => {
                tracing::error!(error = %e, bucket = %bucket, "Object listing failed");
                Err(StorageError::ListFailed(e.to_string()))
            }
        })
        .boxed()
}
