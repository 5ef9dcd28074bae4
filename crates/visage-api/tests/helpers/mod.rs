//! Shared fixtures for router-level tests: local storage in a temp dir, an
//! in-memory analysis store and a scripted face detector.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use bytes::Bytes;
use tempfile::TempDir;
use visage_api::setup::{routes::setup_routes, services::initialize_services};
use visage_core::config::{BaseConfig, PipelineConfig};
use visage_core::models::Likelihood;
use visage_core::{AccessPolicy, Config, StorageBackend};
use visage_db::{AnalysisStore, MemoryAnalysisStore};
use visage_storage::{KeyStream, LocalStorage, Storage, StorageError, StorageResult};
use visage_vision::{DetectedFace, FaceDetector, VisionError};

pub const BASE_URL: &str = "http://localhost:8080/media";
pub const MAX_UPLOAD_BYTES: usize = 4 * 1024;

/// Face detector returning a fixed answer and remembering what it was asked.
pub struct ScriptedDetector {
    faces: Vec<DetectedFace>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedDetector {
    pub fn joy(joy: Likelihood) -> Self {
        Self::faces(vec![DetectedFace::with_joy(joy)])
    }

    pub fn faces(faces: Vec<DetectedFace>) -> Self {
        Self {
            faces,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl FaceDetector for ScriptedDetector {
    async fn detect_faces(&self, image_uri: &str) -> Result<Vec<DetectedFace>, VisionError> {
        self.calls.lock().unwrap().push(image_uri.to_string());
        Ok(self.faces.clone())
    }
}

/// Storage whose writes and listings always fail.
#[derive(Default)]
pub struct BrokenStorage {
    pub uploads: AtomicUsize,
}

#[async_trait]
impl Storage for BrokenStorage {
    async fn upload(&self, _key: &str, _content_type: &str, _data: Bytes) -> StorageResult<String> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::UploadFailed("bucket unreachable".to_string()))
    }

    async fn list(&self) -> StorageResult<KeyStream> {
        Err(StorageError::ListFailed("bucket unreachable".to_string()))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", BASE_URL, key)
    }

    fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::PublicRead
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

pub fn test_config(storage_dir: &str) -> Config {
    Config(Box::new(PipelineConfig {
        base: BaseConfig {
            server_port: 0,
            environment: "test".to_string(),
            log_format: "text".to_string(),
        },
        storage_backend: StorageBackend::Local,
        bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: Some(storage_dir.to_string()),
        local_storage_base_url: Some(BASE_URL.to_string()),
        vision_api_key: "test-key".to_string(),
        vision_endpoint: "http://127.0.0.1:1".to_string(),
        database_url: None,
        db_max_connections: 1,
        db_timeout_seconds: 1,
        max_upload_bytes: MAX_UPLOAD_BYTES,
        external_call_timeout_secs: 5,
    }))
}

pub struct TestApp {
    pub server: TestServer,
    pub detector: Arc<ScriptedDetector>,
    pub analyses: Arc<MemoryAnalysisStore>,
    pub storage_dir: TempDir,
}

impl TestApp {
    pub async fn new(detector: ScriptedDetector) -> Self {
        let storage_dir = TempDir::new().unwrap();
        let root = storage_dir.path().to_str().unwrap().to_string();
        let storage = LocalStorage::new(root, BASE_URL.to_string())
            .await
            .unwrap();
        Self::build(storage_dir, Arc::new(storage), detector).await
    }

    pub async fn with_storage(storage: Arc<dyn Storage>, detector: ScriptedDetector) -> Self {
        Self::build(TempDir::new().unwrap(), storage, detector).await
    }

    async fn build(
        storage_dir: TempDir,
        storage: Arc<dyn Storage>,
        detector: ScriptedDetector,
    ) -> Self {
        let config = test_config(storage_dir.path().to_str().unwrap());
        let detector = Arc::new(detector);
        let analyses = Arc::new(MemoryAnalysisStore::new());

        let state = initialize_services(
            &config,
            storage,
            detector.clone(),
            analyses.clone() as Arc<dyn AnalysisStore>,
        );
        let app = setup_routes(&config, state).await.unwrap();
        let server = TestServer::new(app).expect("Failed to start test server");

        Self {
            server,
            detector,
            analyses,
            storage_dir,
        }
    }

    pub fn stored_file(&self, key: &str) -> Option<Vec<u8>> {
        std::fs::read(self.storage_dir.path().join(key)).ok()
    }
}

pub fn photo_form(file_name: &str, size: usize) -> MultipartForm {
    MultipartForm::new().add_part(
        "photo",
        Part::bytes(vec![0xAB; size])
            .file_name(file_name)
            .mime_type("image/jpeg"),
    )
}
