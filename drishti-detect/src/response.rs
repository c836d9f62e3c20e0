//! Wire format of the detection service and its parsed form

use crate::error::DetectionError;
use serde::Deserialize;

/// Structured result of one processed frame. Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// Detected object labels, in service order
    pub detected_objects: Vec<String>,
    /// Extracted text, possibly empty
    pub extracted_text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    pub data: Option<ApiData>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiData {
    #[serde(default)]
    pub detections: Vec<ApiDetection>,
    #[serde(default)]
    pub texts: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiDetection {
    pub object: String,
    #[serde(default)]
    pub confidence: f64,
}

/// Parse a service response body into a [`DetectionResult`].
///
/// Anything that is not the expected record shape is a
/// [`DetectionError::Malformed`]; the caller degrades to the fallback
/// utterance rather than crashing.
pub(crate) fn parse_response(
    body: &str,
    min_confidence: f64,
) -> Result<DetectionResult, DetectionError> {
    let response: ApiResponse = serde_json::from_str(body)
        .map_err(|e| DetectionError::Malformed(format!("invalid JSON: {}", e)))?;

    let data = response.data.ok_or_else(|| {
        DetectionError::Malformed(format!(
            "response has no data field (message: {:?})",
            response.message
        ))
    })?;

    let detected_objects = data
        .detections
        .into_iter()
        .filter(|d| d.confidence >= min_confidence)
        .map(|d| d.object)
        .collect();

    Ok(DetectionResult {
        detected_objects,
        extracted_text: data.texts,
    })
}
