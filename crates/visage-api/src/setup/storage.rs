//! Storage setup and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use visage_core::Config;
use visage_storage::{create_storage, Storage};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(
        backend = %storage.backend_type(),
        access_policy = ?storage.access_policy(),
        "Storage initialized successfully"
    );
    Ok(storage)
}
