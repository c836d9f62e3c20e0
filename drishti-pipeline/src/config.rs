//! Pipeline configuration and the aggregate config for the whole process

use drishti_core::Error as CoreError;
use drishti_detect::DetectionConfig;
use drishti_eye::{CameraConfig, RecordingConfig};
use drishti_spk::SpeechConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scheduling and queue configuration for the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Frame queue capacity. 1 keeps at most one frame in flight so stale
    /// frames never pile up behind a slow detection call.
    pub frame_queue_capacity: usize,

    /// Speech queue capacity; the utterance backlog beyond this is dropped
    pub speech_queue_capacity: usize,

    /// Capture-worker polling interval while the frame queue is full, ms
    pub frame_poll_ms: u64,

    /// Delay between capture cycles, ms
    pub capture_interval_ms: u64,

    /// How long shutdown waits for workers before aborting them, ms
    pub shutdown_grace_ms: u64,

    /// Restart a worker that exits or panics while the pipeline is running
    pub supervise_workers: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame_queue_capacity: 1,
            speech_queue_capacity: 5,
            frame_poll_ms: 200,
            capture_interval_ms: 1000,
            shutdown_grace_ms: 5000,
            supervise_workers: true,
        }
    }
}

impl PipelineConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.frame_queue_capacity == 0 {
            return Err("Frame queue capacity must be greater than 0".to_string());
        }

        if self.speech_queue_capacity == 0 {
            return Err("Speech queue capacity must be greater than 0".to_string());
        }

        if self.frame_poll_ms == 0 {
            return Err("Frame poll interval must be greater than 0".to_string());
        }

        if self.shutdown_grace_ms == 0 {
            return Err("Shutdown grace period must be greater than 0".to_string());
        }

        if self.shutdown_grace_ms > 60_000 {
            return Err("Shutdown grace period too large (max 60000 ms)".to_string());
        }

        Ok(())
    }
}

/// Aggregate configuration for the whole process
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DrishtiConfig {
    pub camera: CameraConfig,
    pub recording: RecordingConfig,
    pub detection: DetectionConfig,
    pub speech: SpeechConfig,
    pub pipeline: PipelineConfig,
}

impl DrishtiConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| CoreError::Configuration(format!("{}: {}", path.display(), e)))?;
        config
            .validate()
            .map_err(CoreError::Configuration)?;
        Ok(config)
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<(), String> {
        self.camera.validate()?;
        self.recording.validate()?;
        self.detection.validate()?;
        self.speech.validate()?;
        self.pipeline.validate()
    }
}
