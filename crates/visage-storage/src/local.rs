use crate::keys::url_path;
use crate::traits::{KeyStream, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use visage_core::constants::FALLBACK_CONTENT_TYPE;
use visage_core::AccessPolicy;

/// Holds one sidecar per object with its declared content type. Never listed.
const META_DIR: &str = ".meta";

/// A stored file together with the content type declared at upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalObject {
    pub data: Bytes,
    pub content_type: String,
}

/// Local filesystem storage implementation
///
/// Files are served back by the API under `base_url`, so every file is public.
/// The declared content type of each object is kept in a sidecar under
/// `.meta/`, since the filesystem has nowhere to put it.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/visage/photos")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8080/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys that could escape the base storage directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.starts_with('/')
            || storage_key.split(['/', '\\']).any(|segment| segment == "..")
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage key '{}' contains invalid characters",
                storage_key
            )));
        }

        let relative = Path::new(storage_key);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage key '{}' resolves outside storage directory",
                storage_key
            )));
        }

        if relative.components().next() == Some(Component::Normal(META_DIR.as_ref())) {
            return Err(StorageError::InvalidKey(format!(
                "Storage key '{}' uses the reserved '{}' directory",
                storage_key, META_DIR
            )));
        }

        Ok(self.base_path.join(relative))
    }

    fn content_type_path(&self, storage_key: &str) -> PathBuf {
        self.base_path.join(META_DIR).join(storage_key)
    }

    /// Read an object back with its declared content type.
    ///
    /// Files placed in the directory by other means fall back to
    /// `application/octet-stream`.
    pub async fn read(&self, key: &str) -> StorageResult<Option<LocalObject>> {
        let path = self.key_to_path(key)?;
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        }
        let data = fs::read(&path).await?;

        let content_type = match fs::read_to_string(self.content_type_path(key)).await {
            Ok(content_type) => content_type,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                FALLBACK_CONTENT_TYPE.to_string()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Some(LocalObject {
            data: Bytes::from(data),
            content_type,
        }))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

/// Depth-first walk over the storage directory, one file per step.
struct Walk {
    root: PathBuf,
    pending: Vec<PathBuf>,
    current: Option<fs::ReadDir>,
}

async fn next_key(mut walk: Walk) -> StorageResult<Option<(String, Walk)>> {
    loop {
        if let Some(dir) = walk.current.as_mut() {
            match dir.next_entry().await? {
                Some(entry) => {
                    let file_type = entry.file_type().await?;
                    let path = entry.path();
                    if file_type.is_dir() {
                        if path != walk.root.join(META_DIR) {
                            walk.pending.push(path);
                        }
                    } else if file_type.is_file() {
                        let key = relative_key(&walk.root, &path)?;
                        return Ok(Some((key, walk)));
                    }
                    continue;
                }
                None => walk.current = None,
            }
        }

        match walk.pending.pop() {
            Some(next) => walk.current = Some(fs::read_dir(&next).await?),
            None => return Ok(None),
        }
    }
}

fn relative_key(root: &Path, path: &Path) -> StorageResult<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|e| StorageError::ListFailed(e.to_string()))?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let meta_path = self.content_type_path(key);
        self.ensure_parent_dir(&meta_path).await?;
        fs::write(&meta_path, content_type).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to record content type for {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(self.public_url(key))
    }

    async fn list(&self) -> StorageResult<KeyStream> {
        let walk = Walk {
            root: self.base_path.clone(),
            pending: vec![self.base_path.clone()],
            current: None,
        };
        Ok(stream::try_unfold(walk, next_key).boxed())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), url_path(key))
    }

    fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::PublicRead
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
