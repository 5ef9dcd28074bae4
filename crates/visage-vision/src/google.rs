//! Google Cloud Vision client for face detection

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use visage_core::models::Likelihood;

use crate::{DetectedFace, FaceDetector, VisionError};

const FACE_DETECTION: &str = "FACE_DETECTION";
const MAX_FACES: u32 = 10;
/// The key travels in a header so it never appears in a request URL, and
/// therefore never in a transport error message.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Cloud Vision `images:annotate` client
pub struct GoogleVisionClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl Debug for GoogleVisionClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GoogleVisionClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl GoogleVisionClient {
    /// `endpoint` is the API origin, e.g. `https://vision.googleapis.com`.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VisionError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                VisionError::Config(format!(
                    "Failed to create HTTP client for Google Vision API: {}",
                    e
                ))
            })?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Annotate one image by reference using Google Cloud Vision API
    async fn annotate(&self, image_uri: &str) -> Result<AnnotateImageResponse, VisionError> {
        let url = format!("{}/v1/images:annotate", self.endpoint);

        let request_body = json!({
            "requests": [{
                "image": {
                    "source": { "imageUri": image_uri }
                },
                "features": [{
                    "type": FACE_DETECTION,
                    "maxResults": MAX_FACES
                }]
            }]
        });

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| VisionError::Request(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VisionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let batch: BatchAnnotateImagesResponse = response
            .json()
            .await
            .map_err(|e| VisionError::Decode(e.without_url().to_string()))?;

        let first = batch
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| VisionError::Decode("response contained no results".to_string()))?;

        // Per-image errors arrive inside a 200 reply
        if let Some(error) = first.error {
            return Err(VisionError::Response {
                code: error.code,
                message: error.message.unwrap_or_default(),
            });
        }

        Ok(first)
    }
}

#[async_trait]
impl FaceDetector for GoogleVisionClient {
    async fn detect_faces(&self, image_uri: &str) -> Result<Vec<DetectedFace>, VisionError> {
        let start = std::time::Instant::now();

        let response = self.annotate(image_uri).await.map_err(|e| {
            tracing::error!(
                error = %e,
                image_uri = %image_uri,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Google Cloud Vision face detection failed"
            );
            e
        })?;

        let faces: Vec<DetectedFace> = response
            .face_annotations
            .into_iter()
            .map(|face| DetectedFace {
                joy: face.joy_likelihood.unwrap_or(Likelihood::Unknown),
                detection_confidence: face.detection_confidence,
            })
            .collect();

        tracing::info!(
            image_uri = %image_uri,
            faces_count = faces.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Google Cloud Vision face detection completed"
        );

        Ok(faces)
    }
}

// Google Cloud Vision API response types
#[derive(Debug, Deserialize)]
struct BatchAnnotateImagesResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    face_annotations: Vec<FaceAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FaceAnnotation {
    joy_likelihood: Option<Likelihood>,
    detection_confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Status {
    code: Option<i32>,
    message: Option<String>,
}
