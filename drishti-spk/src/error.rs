//! Error types for drishti-spk

use drishti_core::Error as CoreError;
use thiserror::Error;

/// Speech synthesis errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Synthesizer error: {0}")]
    Synthesizer(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Device initialization error: {0}")]
    Init(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpeechError {
    /// Fatal device errors trigger an engine re-initialization attempt
    /// before the next utterance.
    pub fn is_device_fatal(&self) -> bool {
        matches!(self, SpeechError::Engine(_) | SpeechError::Init(_))
    }
}

impl From<SpeechError> for CoreError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Init(msg) => CoreError::DeviceInit(format!("speech: {}", msg)),
            other => CoreError::Device(format!("speech: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_error_display() {
        let err = SpeechError::Engine("espeak exited with 1".to_string());
        assert!(err.to_string().contains("Engine error"));
    }

    #[test]
    fn test_device_fatal_classification() {
        assert!(SpeechError::Engine("x".to_string()).is_device_fatal());
        assert!(!SpeechError::Synthesizer("x".to_string()).is_device_fatal());
    }

    #[test]
    fn test_init_error_is_fatal_core_error() {
        let core: CoreError = SpeechError::Init("no engine".to_string()).into();
        assert!(core.is_fatal());
    }
}
