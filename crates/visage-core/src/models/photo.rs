use bytes::Bytes;
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppError;

/// A photo received from a client, buffered in memory for the pipeline.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Client-declared file name, used verbatim as the object key.
    pub file_name: String,
    /// Client-declared content type; no sniffing is performed.
    pub mime_type: String,
    pub bytes: Bytes,
}

impl UploadRequest {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Enforce the upload size limit.
    pub fn ensure_within(&self, max_upload_bytes: usize) -> Result<(), AppError> {
        ensure_size_within(self.size_bytes(), max_upload_bytes)
    }
}

/// Reject sizes above `max_upload_bytes` with `PayloadTooLarge`.
pub fn ensure_size_within(size: usize, max_upload_bytes: usize) -> Result<(), AppError> {
    if size > max_upload_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "{} bytes exceeds max {} bytes",
            size, max_upload_bytes
        )));
    }
    Ok(())
}

/// Check that a client file name can be used as an object key.
///
/// Names are kept verbatim otherwise: colliding names overwrite earlier objects.
/// Every backend stores the key unchanged, so names a backend would normalise
/// (empty or dot segments, a leading or trailing `/`, control characters) are
/// rejected here rather than silently rewritten.
pub fn validate_object_key(key: &str) -> Result<(), AppError> {
    if key.trim().is_empty() {
        return Err(AppError::InvalidInput("File name is empty".to_string()));
    }
    let invalid_segment = key
        .split(['/', '\\'])
        .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid_segment || key.chars().any(char::is_control) {
        return Err(AppError::InvalidInput(format!(
            "File name '{}' is not a valid object key",
            key.escape_default()
        )));
    }
    Ok(())
}

/// Reference to a photo held by the object store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StoredObject {
    pub key: String,
    pub public_url: String,
}
