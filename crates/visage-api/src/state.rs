//! Application state shared by every handler.

use std::sync::Arc;

use visage_core::Config;
use visage_db::AnalysisStore;

use crate::services::{GalleryService, PhotoPipeline};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Upload path: store, analyze, record
    pub pipeline: PhotoPipeline,
    /// Read path: list stored photos joined with their analyses
    pub gallery: GalleryService,
    pub analyses: Arc<dyn AnalysisStore>,
}
