use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header::ACCEPT, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use visage_core::models::Likelihood;

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::PipelineOutcome;
use crate::state::AppState;
use crate::utils::upload::receive_photo;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub key: String,
    pub public_url: String,
    pub joy: Likelihood,
}

impl From<PipelineOutcome> for UploadResponse {
    fn from(outcome: PipelineOutcome) -> Self {
        UploadResponse {
            key: outcome.stored.key,
            public_url: outcome.stored.public_url,
            joy: outcome.analysis.joy,
        }
    }
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains("application/json"))
}

/// Upload photo handler
///
/// Stores the `photo` file, runs face detection on it and records the joy
/// likelihood. The response is only sent once every stage has resolved.
#[utoipa::path(
    post,
    path = "/upload_photo",
    tag = "photos",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Photo stored, analyzed and recorded", body = UploadResponse),
        (status = 303, description = "Photo stored, analyzed and recorded; redirect to the gallery"),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage, analysis or persistence failure, or no face detected", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, multipart), fields(operation = "upload_photo"))]
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    let request = receive_photo(multipart?, state.pipeline.max_upload_bytes()).await?;
    let outcome = state.pipeline.run(request).await?;

    if wants_json(&headers) {
        Ok((StatusCode::CREATED, Json(UploadResponse::from(outcome))).into_response())
    } else {
        Ok(Redirect::to("/").into_response())
    }
}
