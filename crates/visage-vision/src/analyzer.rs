use visage_core::models::AnalysisResult;
use visage_core::AppError;

use crate::DetectedFace;

/// Reduce a detection to the joy likelihood of the first face.
///
/// Zero faces is `NoFaceDetected`; any further faces are ignored.
pub fn first_face_joy(object_key: &str, faces: &[DetectedFace]) -> Result<AnalysisResult, AppError> {
    let face = faces
        .first()
        .ok_or_else(|| AppError::NoFaceDetected(object_key.to_string()))?;

    Ok(AnalysisResult {
        object_key: object_key.to_string(),
        joy: face.joy,
    })
}
