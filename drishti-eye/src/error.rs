//! Error types for drishti-eye

use drishti_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Device initialization error: {0}")]
    Init(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Recording error: {0}")]
    Recording(String),

    #[error("Transcode error: {0}")]
    Transcode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CameraError> for CoreError {
    fn from(err: CameraError) -> Self {
        match err {
            CameraError::Init(msg) => CoreError::DeviceInit(format!("camera: {}", msg)),
            other => CoreError::Device(format!("camera: {}", other)),
        }
    }
}
