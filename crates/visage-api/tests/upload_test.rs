mod helpers;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use helpers::{photo_form, BrokenStorage, ScriptedDetector, TestApp, BASE_URL, MAX_UPLOAD_BYTES};
use serde_json::Value;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use visage_core::models::Likelihood;

fn accept_json() -> HeaderValue {
    HeaderValue::from_static("application/json")
}

#[tokio::test]
async fn test_upload_stores_analyzes_and_records() {
    let app = TestApp::new(ScriptedDetector::joy(Likelihood::VeryLikely)).await;

    let response = app
        .server
        .post("/upload_photo")
        .add_header(header::ACCEPT, accept_json())
        .multipart(photo_form("photo.jpg", 2048))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["key"], "photo.jpg");
    assert_eq!(body["public_url"], format!("{}/photo.jpg", BASE_URL));
    assert_eq!(body["joy"], "VERY_LIKELY");

    assert_eq!(app.stored_file("photo.jpg").map(|b| b.len()), Some(2048));
    assert_eq!(
        app.detector.calls.lock().unwrap().clone(),
        vec![format!("{}/photo.jpg", BASE_URL)]
    );
    assert_eq!(app.analyses.len().await, 1);
}

#[tokio::test]
async fn test_form_upload_redirects_to_gallery() {
    let app = TestApp::new(ScriptedDetector::joy(Likelihood::Possible)).await;

    let response = app
        .server
        .post("/upload_photo")
        .multipart(photo_form("form.jpg", 100))
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), "/");
    assert_eq!(app.analyses.len().await, 1);
}

#[tokio::test]
async fn test_oversized_upload_is_rejected_before_storage() {
    let app = TestApp::new(ScriptedDetector::joy(Likelihood::VeryLikely)).await;

    let response = app
        .server
        .post("/upload_photo")
        .add_header(header::ACCEPT, accept_json())
        .multipart(photo_form("big.jpg", MAX_UPLOAD_BYTES + 1))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert!(app.stored_file("big.jpg").is_none());
    assert_eq!(app.detector.call_count(), 0);
    assert!(app.analyses.is_empty().await);
}

#[tokio::test]
async fn test_body_over_transport_limit_is_payload_too_large() {
    let app = TestApp::new(ScriptedDetector::joy(Likelihood::VeryLikely)).await;

    let response = app
        .server
        .post("/upload_photo")
        .multipart(photo_form("huge.jpg", 256 * 1024))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.detector.call_count(), 0);
}

#[tokio::test]
async fn test_missing_photo_field_is_bad_request() {
    let app = TestApp::new(ScriptedDetector::joy(Likelihood::VeryLikely)).await;

    let form = MultipartForm::new().add_text("caption", "no file here");
    let response = app.server.post("/upload_photo").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_traversal_file_name_is_bad_request() {
    let app = TestApp::new(ScriptedDetector::joy(Likelihood::VeryLikely)).await;

    let form = MultipartForm::new().add_part(
        "photo",
        Part::bytes(vec![1u8; 10])
            .file_name("../escape.jpg")
            .mime_type("image/jpeg"),
    );
    let response = app.server.post("/upload_photo").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(app.detector.call_count(), 0);
}

#[tokio::test]
async fn test_no_face_is_reported_and_not_recorded() {
    let app = TestApp::new(ScriptedDetector::faces(Vec::new())).await;

    let response = app
        .server
        .post("/upload_photo")
        .add_header(header::ACCEPT, accept_json())
        .multipart(photo_form("landscape.jpg", 100))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "NO_FACE_DETECTED");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Could not detect faces"));
    // The object was already written; only the record is skipped
    assert!(app.stored_file("landscape.jpg").is_some());
    assert!(app.analyses.is_empty().await);
}

#[tokio::test]
async fn test_storage_failure_skips_vision_and_record() {
    let storage = Arc::new(BrokenStorage::default());
    let app = TestApp::with_storage(
        storage.clone(),
        ScriptedDetector::joy(Likelihood::VeryLikely),
    )
    .await;

    let response = app
        .server
        .post("/upload_photo")
        .add_header(header::ACCEPT, accept_json())
        .multipart(photo_form("photo.jpg", 100))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "STORAGE_WRITE_ERROR");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Could not upload image"));
    assert_eq!(storage.uploads.load(Ordering::SeqCst), 1);
    assert_eq!(app.detector.call_count(), 0);
    assert!(app.analyses.is_empty().await);
}

#[tokio::test]
async fn test_reupload_overwrites_and_keeps_one_record() {
    let app = TestApp::new(ScriptedDetector::joy(Likelihood::Likely)).await;

    for size in [100, 200] {
        let response = app
            .server
            .post("/upload_photo")
            .add_header(header::ACCEPT, accept_json())
            .multipart(photo_form("same.jpg", size))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    assert_eq!(app.stored_file("same.jpg").map(|b| b.len()), Some(200));
    assert_eq!(app.analyses.len().await, 1);
}
