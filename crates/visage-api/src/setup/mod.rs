//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use visage_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;
    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        "Configuration loaded and validated successfully"
    );

    let analyses = database::setup_analysis_store(&config).await?;
    let storage = storage::setup_storage(&config).await?;
    let detector = services::setup_face_detector(&config)?;

    let state = services::initialize_services(&config, storage, detector, analyses);
    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
