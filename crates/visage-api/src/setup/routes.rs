//! Route configuration and setup

use crate::handlers::{analysis, gallery, health, media, photo_upload};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use visage_core::{Config, StorageBackend};
use visage_storage::LocalStorage;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub async fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    let body_limit = config.max_upload_bytes() + MULTIPART_OVERHEAD_BYTES;

    let upload_routes = Router::new()
        .route("/upload_photo", post(photo_upload::upload_photo))
        .layer(DefaultBodyLimit::max(body_limit));

    let app = Router::new()
        .route("/", get(gallery::gallery_page))
        .route("/api/photos", get(gallery::list_photos))
        .route("/api/photos/{key}/analysis", get(analysis::get_analysis))
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .merge(upload_routes)
        .with_state(state)
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"));

    let app = match config.storage_backend() {
        StorageBackend::Local => {
            let root = config.local_storage_path().ok_or_else(|| {
                anyhow::anyhow!("LOCAL_STORAGE_PATH must be set when using local storage backend")
            })?;
            let base_url = config.local_storage_base_url().unwrap_or_default();
            let local = LocalStorage::new(root, base_url.to_string()).await?;
            tracing::info!(root = %root, "Serving local storage under /media");
            app.merge(
                Router::new()
                    .route("/media/{*key}", get(media::serve_media))
                    .with_state(Arc::new(local)),
            )
        }
        StorageBackend::Gcs | StorageBackend::S3 => app,
    };

    tracing::info!(body_limit_bytes = body_limit, "Routes configured");

    Ok(app.layer(TraceLayer::new_for_http()))
}
