use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use visage_core::models::{AnalysisRecord, AnalysisResult, StoredObject};
use visage_core::AppError;

use super::analysis::{ensure_matching_keys, AnalysisStore};

/// In-process analysis store. Not durable; used in development and tests.
#[derive(Clone, Default)]
pub struct MemoryAnalysisStore {
    records: Arc<RwLock<HashMap<String, AnalysisRecord>>>,
}

impl MemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn record(
        &self,
        stored: &StoredObject,
        analysis: &AnalysisResult,
    ) -> Result<AnalysisRecord, AppError> {
        ensure_matching_keys(stored, analysis)?;

        let record = AnalysisRecord {
            object_key: stored.key.clone(),
            joy: analysis.joy,
            recorded_at: Utc::now(),
        };
        self.records
            .write()
            .await
            .insert(record.object_key.clone(), record.clone());

        tracing::debug!(key = %record.object_key, joy = %record.joy, "Analysis recorded in memory");
        Ok(record)
    }

    async fn get(&self, object_key: &str) -> Result<Option<AnalysisRecord>, AppError> {
        Ok(self.records.read().await.get(object_key).cloned())
    }

    async fn get_many(&self, object_keys: &[String]) -> Result<Vec<AnalysisRecord>, AppError> {
        let records = self.records.read().await;
        Ok(object_keys
            .iter()
            .filter_map(|key| records.get(key).cloned())
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
