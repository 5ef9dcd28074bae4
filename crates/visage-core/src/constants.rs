//! Constants shared across crates.

/// Default upload limit: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Multipart field that carries the photo.
pub const PHOTO_FIELD: &str = "photo";

/// Content type used when the client does not declare one.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Public host for Google Cloud Storage objects.
pub const GCS_PUBLIC_HOST: &str = "https://storage.googleapis.com";

/// Default Google Cloud Vision endpoint.
pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com";

/// Default timeout applied to each external call of the upload pipeline.
pub const DEFAULT_EXTERNAL_CALL_TIMEOUT_SECS: u64 = 30;
