//! Configuration for camera capture and recording

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// V4L2 device index (/dev/video{N})
    pub device_index: u32,

    /// Capture resolution (width, height)
    pub resolution: (u32, u32),

    /// Autofocus settle delay between the unlock and lock signals, in
    /// milliseconds. On the critical path of every capture.
    pub focus_settle_ms: u64,

    /// Warm-up delay after device initialization, in milliseconds
    pub warmup_ms: u64,

    /// Directory for captured frame files
    pub work_dir: PathBuf,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            resolution: (640, 480),
            focus_settle_ms: 500,
            warmup_ms: 2000,
            work_dir: std::env::temp_dir().join("drishti"),
        }
    }
}

impl CameraConfig {
    pub fn device_path(&self) -> String {
        format!("/dev/video{}", self.device_index)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.resolution.0 == 0 || self.resolution.1 == 0 {
            return Err("Camera resolution must be non-zero".to_string());
        }

        if self.focus_settle_ms > 10_000 {
            return Err("Focus settle delay too large (max 10000 ms)".to_string());
        }

        if self.warmup_ms > 60_000 {
            return Err("Warm-up delay too large (max 60000 ms)".to_string());
        }

        if self.work_dir.to_string_lossy().contains("..") {
            return Err("Work directory path cannot contain '..'".to_string());
        }

        Ok(())
    }
}

/// Session recording configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Enable opportunistic session recording
    pub enabled: bool,

    /// Working file for the raw encoded stream
    pub raw_path: PathBuf,

    /// Final distributable container file
    pub output_path: PathBuf,

    /// External transcoder command invoked after stop()
    pub transcoder: String,

    /// Recording frame rate
    pub framerate: u32,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        let dir = std::env::temp_dir().join("drishti");
        Self {
            enabled: true,
            raw_path: dir.join("session_raw.h264"),
            output_path: dir.join("session.mp4"),
            transcoder: "ffmpeg".to_string(),
            framerate: 20,
        }
    }
}

impl RecordingConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.transcoder.is_empty() {
            return Err("Transcoder command cannot be empty".to_string());
        }

        if self.framerate == 0 || self.framerate > 120 {
            return Err("Recording frame rate must be between 1 and 120".to_string());
        }

        if self.raw_path == self.output_path {
            return Err("Raw and output recording paths must differ".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_config_is_valid() {
        assert!(CameraConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let config = CameraConfig {
            resolution: (0, 480),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_device_path() {
        let config = CameraConfig {
            device_index: 2,
            ..Default::default()
        };
        assert_eq!(config.device_path(), "/dev/video2");
    }

    #[test]
    fn test_default_recording_config_is_valid() {
        assert!(RecordingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_framerate_rejected() {
        let config = RecordingConfig {
            framerate: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_colliding_recording_paths_rejected() {
        let config = RecordingConfig {
            raw_path: PathBuf::from("/tmp/a.h264"),
            output_path: PathBuf::from("/tmp/a.h264"),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
