//! Utterance derivation from detection results
//!
//! The formatting is deterministic and kept byte-compatible with the
//! deployed companion apps that recognize these phrases.

use drishti_detect::DetectionResult;

/// One unit of text scheduled for speech output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance(pub String);

impl Utterance {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// Spoken when the detection call fails or returns a malformed response
pub const API_ERROR_UTTERANCE: &str = "An error occurred while making API call.";

/// Derive the spoken summary of a detection result.
pub fn utterance_for(result: &DetectionResult) -> Utterance {
    let mut text = if result.detected_objects.is_empty() {
        "I found nothing".to_string()
    } else {
        format!("I found {}", result.detected_objects.join(", "))
    };

    if result.extracted_text.trim().is_empty() {
        text.push_str(" and no text");
    } else {
        text.push_str(" and the text in front is: ");
        text.push_str(&result.extracted_text);
    }

    Utterance(text)
}

/// The fixed degradation utterance for detection failures.
pub fn fallback_utterance() -> Utterance {
    Utterance(API_ERROR_UTTERANCE.to_string())
}
