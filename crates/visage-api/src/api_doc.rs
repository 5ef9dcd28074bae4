//! OpenAPI documentation, served at `/api/openapi.json` and browsable at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use visage_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Visage API",
        version = "0.1.0",
        description = "Photo upload service: stores each photo in an object store, detects faces with a vision service and records the joy likelihood of the first face."
    ),
    paths(
        handlers::photo_upload::upload_photo,
        handlers::gallery::gallery_page,
        handlers::gallery::list_photos,
        handlers::analysis::get_analysis,
        handlers::health::liveness_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        handlers::photo_upload::UploadResponse,
        models::GalleryEntry,
        models::AnalysisRecord,
        models::Likelihood,
        error::ErrorResponse,
    )),
    tags(
        (name = "photos", description = "Upload and analysis"),
        (name = "gallery", description = "Stored photos"),
        (name = "health", description = "Health checks")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_every_route() {
        let spec = get_openapi_spec();
        for path in [
            "/upload_photo",
            "/",
            "/api/photos",
            "/api/photos/{key}/analysis",
            "/health/live",
            "/health/ready",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
