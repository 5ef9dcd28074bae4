//! Visage Vision Library
//!
//! Face detection against Google Cloud Vision. The pipeline only depends on the
//! [`FaceDetector`] trait; [`GoogleVisionClient`] is the production implementation.

pub mod analyzer;
pub mod google;
pub mod traits;

pub use analyzer::first_face_joy;
pub use google::GoogleVisionClient;
pub use traits::{DetectedFace, FaceDetector, VisionError};
