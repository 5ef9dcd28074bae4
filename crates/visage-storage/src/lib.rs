//! Visage Storage Library
//!
//! This crate provides the object store writer and lister used by the upload
//! pipeline and the gallery. It includes the Storage trait and implementations
//! for Google Cloud Storage, S3 and the local filesystem.
//!
//! # Object keys
//!
//! Objects are stored under the client-declared file name, verbatim. A later
//! upload with the same name overwrites the earlier object. Keys that a
//! backend would store under a different name are rejected with
//! [`StorageError::InvalidKey`]. Public URLs percent-encode each key segment.

pub mod factory;
#[cfg(feature = "storage-gcs")]
pub mod gcs;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(any(feature = "storage-gcs", feature = "storage-s3"))]
pub(crate) mod object;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::url_path;
#[cfg(feature = "storage-gcs")]
pub use gcs::GcsStorage;
#[cfg(feature = "storage-local")]
pub use local::{LocalObject, LocalStorage};
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{KeyStream, Storage, StorageError, StorageResult};
pub use visage_core::{AccessPolicy, StorageBackend};
