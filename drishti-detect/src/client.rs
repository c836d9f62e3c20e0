//! HTTP detection client

use crate::config::DetectionConfig;
use crate::error::DetectionError;
use crate::response::{parse_response, DetectionResult};
use async_trait::async_trait;
use drishti_eye::Frame;
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use tracing::debug;

/// Seam for the remote detection/OCR collaborator
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, frame: &Frame) -> Result<DetectionResult, DetectionError>;
}

/// Detection client over HTTP multipart upload
pub struct HttpDetectionClient {
    config: Arc<DetectionConfig>,
    client: reqwest::Client,
}

impl HttpDetectionClient {
    pub fn new(config: Arc<DetectionConfig>) -> Result<Self, DetectionError> {
        config
            .validate()
            .map_err(DetectionError::Config)?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl Detector for HttpDetectionClient {
    async fn detect(&self, frame: &Frame) -> Result<DetectionResult, DetectionError> {
        let image = tokio::fs::read(&frame.path).await?;

        let file_name = frame
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "frame.jpg".to_string());

        let part = Part::bytes(image)
            .file_name(file_name)
            .mime_str("image/jpeg")
            .map_err(DetectionError::Network)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Accept", "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DetectionError::Timeout
                } else {
                    DetectionError::Network(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DetectionError::Http(status.as_u16()));
        }

        let body = response.text().await.map_err(DetectionError::Network)?;
        debug!("Detection response for frame {}: {} bytes", frame.id, body.len());

        parse_response(&body, self.config.min_confidence)
    }
}
