//! Service wiring: every collaborator is built once here and shared by handle.

use anyhow::{Context, Result};
use std::sync::Arc;
use visage_core::Config;
use visage_db::AnalysisStore;
use visage_storage::Storage;
use visage_vision::{FaceDetector, GoogleVisionClient};

use crate::services::{GalleryService, PhotoPipeline};
use crate::state::AppState;

pub fn setup_face_detector(config: &Config) -> Result<Arc<dyn FaceDetector>> {
    let client = GoogleVisionClient::new(
        config.vision_endpoint(),
        config.vision_api_key(),
        config.external_call_timeout(),
    )
    .context("Failed to build vision client")?;
    tracing::info!(endpoint = %config.vision_endpoint(), "Vision client initialized");
    Ok(Arc::new(client))
}

pub fn initialize_services(
    config: &Config,
    storage: Arc<dyn Storage>,
    detector: Arc<dyn FaceDetector>,
    analyses: Arc<dyn AnalysisStore>,
) -> Arc<AppState> {
    let pipeline = PhotoPipeline::new(
        storage.clone(),
        detector,
        analyses.clone(),
        config.max_upload_bytes(),
        config.external_call_timeout(),
    );
    let gallery = GalleryService::new(storage, analyses.clone());

    Arc::new(AppState {
        config: config.clone(),
        pipeline,
        gallery,
        analyses,
    })
}
