//! Gallery read path: enumerate stored photos and join recorded analyses.

use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use visage_core::models::{GalleryEntry, Likelihood};
use visage_core::AppError;
use visage_db::AnalysisStore;
use visage_storage::{Storage, StorageError};

#[derive(Clone)]
pub struct GalleryService {
    storage: Arc<dyn Storage>,
    analyses: Arc<dyn AnalysisStore>,
}

impl GalleryService {
    pub fn new(storage: Arc<dyn Storage>, analyses: Arc<dyn AnalysisStore>) -> Self {
        Self { storage, analyses }
    }

    /// Lazily yield one entry per stored object, in the order the store lists them.
    pub async fn stream(&self) -> Result<BoxStream<'static, Result<GalleryEntry, AppError>>, AppError> {
        let keys = self
            .storage
            .list()
            .await
            .map_err(StorageError::into_list_error)?;

        let storage = self.storage.clone();
        let entries = keys
            .map_err(StorageError::into_list_error)
            .map_ok(move |key| {
                let url = storage.public_url(&key);
                GalleryEntry::new(key, url)
            });

        Ok(entries.boxed())
    }

    /// Collect the whole listing and attach the joy likelihood recorded for each key.
    ///
    /// A listing failure fails the call. A failed analysis lookup does not: the
    /// entries are returned without joy.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<GalleryEntry>, AppError> {
        let entries: Vec<GalleryEntry> = self.stream().await?.try_collect().await?;
        if entries.is_empty() {
            return Ok(entries);
        }

        let keys: Vec<String> = entries.iter().map(|e| e.key.clone()).collect();
        let joy_by_key: HashMap<String, Likelihood> = match self.analyses.get_many(&keys).await {
            Ok(records) => records
                .into_iter()
                .map(|record| (record.object_key, record.joy))
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Analysis lookup failed, rendering gallery without joy");
                HashMap::new()
            }
        };

        let entries: Vec<GalleryEntry> = entries
            .into_iter()
            .map(|entry| {
                let joy = joy_by_key.get(&entry.key).copied();
                entry.with_joy(joy)
            })
            .collect();

        tracing::debug!(count = entries.len(), "Gallery listed");
        Ok(entries)
    }
}
