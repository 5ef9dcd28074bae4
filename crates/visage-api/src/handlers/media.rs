//! Files of the local storage backend, served with their declared content type.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use visage_core::AppError;
use visage_storage::{LocalStorage, StorageError};

use crate::error::HttpAppError;

#[tracing::instrument(skip(storage))]
pub async fn serve_media(
    State(storage): State<Arc<LocalStorage>>,
    Path(key): Path<String>,
) -> Result<Response, HttpAppError> {
    let object = storage
        .read(&key)
        .await
        .map_err(|e| match e {
            StorageError::InvalidKey(_) => AppError::NotFound(format!("No photo named '{}'", key)),
            other => AppError::Internal(format!("Failed to read '{}': {}", key, other)),
        })?
        .ok_or_else(|| AppError::NotFound(format!("No photo named '{}'", key)))?;

    Ok(([(CONTENT_TYPE, object.content_type)], object.data).into_response())
}
