//! Gallery pages: the HTML index with the upload form, and its JSON twin.

use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Json,
};
use visage_core::constants::PHOTO_FIELD;
use visage_core::models::GalleryEntry;
use visage_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "gallery.html")]
struct GalleryTemplate<'a> {
    entries: &'a [GalleryEntry],
    photo_field: &'a str,
    max_upload_mb: usize,
}

fn render_gallery(entries: &[GalleryEntry], max_upload_bytes: usize) -> Result<String, AppError> {
    GalleryTemplate {
        entries,
        photo_field: PHOTO_FIELD,
        max_upload_mb: max_upload_bytes / (1024 * 1024),
    }
    .render()
    .map_err(|e| AppError::Internal(format!("Failed to render gallery: {}", e)))
}

/// Render the gallery page
#[utoipa::path(
    get,
    path = "/",
    tag = "gallery",
    responses(
        (status = 200, description = "Gallery page", content_type = "text/html", body = String),
        (status = 500, description = "Listing failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn gallery_page(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, HttpAppError> {
    let entries = state.gallery.list().await?;
    let page = render_gallery(&entries, state.pipeline.max_upload_bytes())?;
    Ok(Html(page))
}

/// List stored photos with their recorded joy likelihood
#[utoipa::path(
    get,
    path = "/api/photos",
    tag = "gallery",
    responses(
        (status = 200, description = "Stored photos", body = Vec<GalleryEntry>),
        (status = 500, description = "Listing failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_photos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GalleryEntry>>, HttpAppError> {
    let entries = state.gallery.list().await?;
    Ok(Json(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use visage_core::models::Likelihood;

    #[test]
    fn test_empty_gallery_renders_form() {
        let html = render_gallery(&[], 5 * 1024 * 1024).unwrap();
        assert!(html.contains("action=\"/upload_photo\""));
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("name=\"photo\""));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_entries_render_with_joy() {
        let entries = vec![
            GalleryEntry::new("a.jpg", "http://localhost:8080/media/a.jpg")
                .with_joy(Some(Likelihood::VeryLikely)),
            GalleryEntry::new("b.jpg", "http://localhost:8080/media/b.jpg"),
        ];

        let html = render_gallery(&entries, 5 * 1024 * 1024).unwrap();

        assert_eq!(html.matches("<img").count(), 2);
        assert!(html.contains("a.jpg"));
        assert!(html.contains("b.jpg"));
        assert!(html.contains("very likely"));
        assert!(html.contains("not analyzed"));
    }
}
