use async_trait::async_trait;
use thiserror::Error;
use visage_core::models::Likelihood;
use visage_core::AppError;

/// Vision service errors
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Vision request failed: {0}")]
    Request(String),

    #[error("Vision API request failed: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Vision API error: {code:?} - {message}")]
    Response { code: Option<i32>, message: String },

    #[error("Failed to parse vision response: {0}")]
    Decode(String),

    #[error("Vision client configuration error: {0}")]
    Config(String),
}

impl From<VisionError> for AppError {
    fn from(err: VisionError) -> Self {
        AppError::Analysis(err.to_string())
    }
}

/// One face found by the vision service, in service order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedFace {
    pub joy: Likelihood,
    pub detection_confidence: Option<f64>,
}

impl DetectedFace {
    pub fn with_joy(joy: Likelihood) -> Self {
        Self {
            joy,
            detection_confidence: None,
        }
    }
}

/// Remote face detection.
///
/// Implementations receive an object reference (`gs://…` or an HTTP URL),
/// never the image bytes.
#[async_trait]
pub trait FaceDetector: Send + Sync {
    async fn detect_faces(&self, image_uri: &str) -> Result<Vec<DetectedFace>, VisionError>;
}
