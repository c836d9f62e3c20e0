//! Configuration for the detection client

use serde::{Deserialize, Serialize};

/// Detection service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Detection/OCR endpoint URL
    pub endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Skip TLS certificate validation (development only)
    pub accept_invalid_certs: bool,

    /// Drop detections below this confidence
    pub min_confidence: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://localhost:8443/api/v1/image-to-text".to_string(),
            timeout_secs: 10,
            accept_invalid_certs: false,
            min_confidence: 0.0,
        }
    }
}

impl DetectionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.is_empty() {
            return Err("Detection endpoint cannot be empty".to_string());
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err("Detection endpoint must be an http(s) URL".to_string());
        }

        if self.endpoint.len() > 2048 {
            return Err("Detection endpoint URL too long (max 2048 chars)".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Detection timeout must be greater than 0".to_string());
        }

        if self.timeout_secs > 300 {
            return Err("Detection timeout too large (max 300 seconds)".to_string());
        }

        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err("Minimum confidence must be between 0.0 and 1.0".to_string());
        }

        Ok(())
    }
}
