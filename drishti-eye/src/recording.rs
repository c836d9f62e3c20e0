//! Session recording controller
//!
//! Start/stop of continuous video persistence, independent of still-frame
//! capture but mutually exclusive with it on the device handle. State
//! transitions are atomic with respect to the capture worker's reads.

use crate::camera::CameraManager;
use crate::config::RecordingConfig;
use crate::error::CameraError;
use parking_lot::RwLock;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{info, warn};

/// Whether continuous video persistence is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
}

pub struct RecordingController {
    config: Arc<RecordingConfig>,
    camera: Arc<CameraManager>,
    state: RwLock<RecordingState>,
}

impl RecordingController {
    pub fn new(config: Arc<RecordingConfig>, camera: Arc<CameraManager>) -> Self {
        Self {
            config,
            camera,
            state: RwLock::new(RecordingState::Idle),
        }
    }

    pub fn state(&self) -> RecordingState {
        *self.state.read()
    }

    /// Start recording. No-op if already recording.
    pub async fn start(&self) -> Result<(), CameraError> {
        if !self.config.enabled {
            return Ok(());
        }

        // Atomic check-and-set so two callers cannot both start the stream
        {
            let mut state = self.state.write();
            if *state == RecordingState::Recording {
                return Ok(());
            }
            *state = RecordingState::Recording;
        }

        match self.camera.begin_recording(&self.config.raw_path).await {
            Ok(()) => {
                info!("Session recording started");
                Ok(())
            }
            Err(e) => {
                *self.state.write() = RecordingState::Idle;
                Err(e)
            }
        }
    }

    /// Stop recording and transcode the raw stream into the distributable
    /// container. No-op if idle.
    pub async fn stop(&self) -> Result<(), CameraError> {
        {
            let mut state = self.state.write();
            if *state == RecordingState::Idle {
                return Ok(());
            }
            *state = RecordingState::Idle;
        }

        self.camera.end_recording().await?;
        info!("Session recording stopped, transcoding");
        self.transcode().await
    }

    /// Shell out to the external encoder to produce the final container.
    async fn transcode(&self) -> Result<(), CameraError> {
        if !self.config.raw_path.exists() {
            warn!(
                "Raw recording {} missing, skipping transcode",
                self.config.raw_path.display()
            );
            return Ok(());
        }

        let status = Command::new(&self.config.transcoder)
            .args(["-y", "-loglevel", "error"])
            .args(["-framerate", &self.config.framerate.to_string()])
            .arg("-i")
            .arg(&self.config.raw_path)
            .args(["-c", "copy"])
            .arg(&self.config.output_path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                CameraError::Transcode(format!(
                    "{} failed to run: {}",
                    self.config.transcoder, e
                ))
            })?;

        if !status.success() {
            return Err(CameraError::Transcode(format!(
                "Transcode exited with status {}",
                status
            )));
        }

        info!("Recording saved to {}", self.config.output_path.display());
        Ok(())
    }
}
