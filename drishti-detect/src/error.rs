//! Error types for drishti-detect

use drishti_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error: status {0}")]
    Http(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DetectionError> for CoreError {
    fn from(err: DetectionError) -> Self {
        CoreError::Network(format!("Detection error: {}", err))
    }
}
