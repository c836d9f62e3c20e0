//! Error types for drishti-pipeline

use drishti_core::Error as CoreError;
use drishti_eye::CameraError;
use drishti_spk::SpeechError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Camera or audio device failed to initialize at startup. Fatal; the
    /// process exits non-zero. Everything else degrades at runtime.
    #[error("Device initialization error: {0}")]
    DeviceInit(String),

    #[error("Pipeline state error: {0}")]
    State(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),
}

impl From<PipelineError> for CoreError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::DeviceInit(msg) => CoreError::DeviceInit(msg),
            PipelineError::Config(msg) => CoreError::Configuration(msg),
            other => CoreError::Device(format!("Pipeline error: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_init_is_fatal() {
        let core: CoreError = PipelineError::DeviceInit("no camera".to_string()).into();
        assert!(core.is_fatal());
    }

    #[test]
    fn test_state_error_is_not_fatal() {
        let core: CoreError = PipelineError::State("already running".to_string()).into();
        assert!(!core.is_fatal());
    }
}
