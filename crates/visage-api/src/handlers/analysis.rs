use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use visage_core::models::AnalysisRecord;
use visage_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Get the recorded analysis of one stored photo
#[utoipa::path(
    get,
    path = "/api/photos/{key}/analysis",
    tag = "photos",
    params(
        ("key" = String, Path, description = "Object key (the uploaded file name)")
    ),
    responses(
        (status = 200, description = "Recorded analysis", body = AnalysisRecord),
        (status = 404, description = "No analysis recorded for this key", body = ErrorResponse),
        (status = 500, description = "Persistence failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<AnalysisRecord>, HttpAppError> {
    let record = state
        .analyses
        .get(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No analysis recorded for '{}'", key)))?;

    Ok(Json(record))
}
