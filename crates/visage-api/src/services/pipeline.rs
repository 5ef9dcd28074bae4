//! Upload pipeline: store the photo, analyze it by reference, record the result.
//!
//! Stages run strictly in order and the first failure short-circuits. Each
//! external call is bounded by the configured timeout; a timeout surfaces as the
//! error kind of the stage that timed out.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use visage_core::models::{
    validate_object_key, AnalysisResult, StoredObject, UploadRequest,
};
use visage_core::AppError;
use visage_db::AnalysisStore;
use visage_storage::{Storage, StorageError};
use visage_vision::{first_face_joy, FaceDetector};

/// Result of a fully resolved pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub stored: StoredObject,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Store,
    Analyze,
    Record,
}

impl Stage {
    fn timed_out(self, limit: Duration) -> AppError {
        let msg = format!("timed out after {}s", limit.as_secs_f64());
        match self {
            Stage::Store => AppError::StorageWrite(msg),
            Stage::Analyze => AppError::Analysis(msg),
            Stage::Record => AppError::Persistence(msg),
        }
    }
}

async fn bounded<T, F>(stage: Stage, limit: Duration, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(stage = ?stage, timeout_secs = limit.as_secs_f64(), "Pipeline stage timed out");
            Err(stage.timed_out(limit))
        }
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[derive(Clone)]
pub struct PhotoPipeline {
    storage: Arc<dyn Storage>,
    detector: Arc<dyn FaceDetector>,
    analyses: Arc<dyn AnalysisStore>,
    max_upload_bytes: usize,
    call_timeout: Duration,
}

impl PhotoPipeline {
    pub fn new(
        storage: Arc<dyn Storage>,
        detector: Arc<dyn FaceDetector>,
        analyses: Arc<dyn AnalysisStore>,
        max_upload_bytes: usize,
        call_timeout: Duration,
    ) -> Self {
        Self {
            storage,
            detector,
            analyses,
            max_upload_bytes,
            call_timeout,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    #[tracing::instrument(
        skip(self, request),
        fields(key = %request.file_name, size_bytes = request.size_bytes(), mime_type = %request.mime_type)
    )]
    pub async fn run(&self, request: UploadRequest) -> Result<PipelineOutcome, AppError> {
        let start = Instant::now();

        // Nothing external happens until the request is known to be acceptable
        request.ensure_within(self.max_upload_bytes)?;
        validate_object_key(&request.file_name)?;

        let stored = self.store(request).await?;
        let analysis = self.analyze(&stored).await?;
        self.record(&stored, &analysis).await?;

        tracing::info!(
            key = %stored.key,
            joy = %analysis.joy,
            duration_ms = elapsed_ms(start),
            "Photo pipeline completed"
        );

        Ok(PipelineOutcome { stored, analysis })
    }

    async fn store(&self, request: UploadRequest) -> Result<StoredObject, AppError> {
        let start = Instant::now();
        let UploadRequest {
            file_name,
            mime_type,
            bytes,
        } = request;
        let size = bytes.len();

        let public_url = bounded(Stage::Store, self.call_timeout, async {
            self.storage
                .upload(&file_name, &mime_type, bytes)
                .await
                .map_err(StorageError::into_write_error)
        })
        .await?;

        tracing::info!(
            key = %file_name,
            size_bytes = size,
            public_url = %public_url,
            duration_ms = elapsed_ms(start),
            "Photo stored"
        );

        Ok(StoredObject {
            key: file_name,
            public_url,
        })
    }

    async fn analyze(&self, stored: &StoredObject) -> Result<AnalysisResult, AppError> {
        let start = Instant::now();
        let image_uri = self.storage.analysis_uri(&stored.key);

        let faces = bounded(Stage::Analyze, self.call_timeout, async {
            self.detector
                .detect_faces(&image_uri)
                .await
                .map_err(AppError::from)
        })
        .await?;

        let analysis = first_face_joy(&stored.key, &faces)?;

        tracing::info!(
            key = %stored.key,
            image_uri = %image_uri,
            faces_count = faces.len(),
            joy = %analysis.joy,
            duration_ms = elapsed_ms(start),
            "Photo analyzed"
        );

        Ok(analysis)
    }

    async fn record(&self, stored: &StoredObject, analysis: &AnalysisResult) -> Result<(), AppError> {
        let start = Instant::now();

        let record = bounded(
            Stage::Record,
            self.call_timeout,
            self.analyses.record(stored, analysis),
        )
        .await?;

        tracing::info!(
            key = %record.object_key,
            joy = %record.joy,
            duration_ms = elapsed_ms(start),
            "Analysis recorded"
        );

        Ok(())
    }
}
