//! Camera device abstraction
//!
//! The hardware is reached through command-line tools (`v4l2-ctl` for focus
//! control, `ffmpeg` for exposure and recording), the same way the speech
//! side reaches espeak-ng. V4L2 allows a single streaming consumer per
//! device node, so while the recorder owns the stream, stills are taken
//! from a continuously refreshed snapshot of that stream instead of opening
//! the device a second time. The trait is the seam for tests and for other
//! camera stacks.

use crate::config::CameraConfig;
use crate::error::CameraError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Refresh rate of the live snapshot sidecar output while recording
const SNAPSHOT_FPS: u32 = 2;

/// Focus signal for the two-phase autofocus protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    /// Let the lens hunt (continuous autofocus on)
    Unlock,
    /// Freeze the lens at its current position
    Lock,
}

/// Camera hardware operations
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Initialize the device. Called once at startup; failure is fatal.
    async fn initialize(&self) -> Result<(), CameraError>;

    /// Send a focus signal
    async fn set_focus(&self, mode: FocusMode) -> Result<(), CameraError>;

    /// Take one exposure and write it to `path`
    async fn expose(&self, path: &Path) -> Result<(), CameraError>;

    /// Begin writing a raw encoded stream to `path`
    async fn start_recording(&self, path: &Path) -> Result<(), CameraError>;

    /// Stop the raw stream and finalize the working file
    async fn stop_recording(&self) -> Result<(), CameraError>;

    /// Release the device handle
    async fn release(&self);

    fn is_initialized(&self) -> bool;
}

/// V4L2 camera reached through v4l2-ctl and ffmpeg
pub struct V4l2Device {
    config: Arc<CameraConfig>,
    initialized: RwLock<bool>,
    recorder: tokio::sync::Mutex<Option<Child>>,
}

impl V4l2Device {
    pub fn new(config: Arc<CameraConfig>) -> Self {
        Self {
            config,
            initialized: RwLock::new(false),
            recorder: tokio::sync::Mutex::new(None),
        }
    }

    fn video_size(&self) -> String {
        format!("{}x{}", self.config.resolution.0, self.config.resolution.1)
    }

    fn snapshot_path(&self) -> PathBuf {
        self.config.work_dir.join("live-snapshot.jpg")
    }

    /// Serve a still from the recorder's snapshot sidecar. The stream needs
    /// a moment after start before the first snapshot lands; until then the
    /// capture cycle is skipped.
    async fn still_from_stream(&self, path: &Path) -> Result<(), CameraError> {
        let snapshot = self.snapshot_path();
        if !snapshot.exists() {
            return Err(CameraError::Capture(
                "Live snapshot not yet available".to_string(),
            ));
        }

        tokio::fs::copy(&snapshot, path)
            .await
            .map_err(|e| CameraError::Capture(format!("Failed to copy live snapshot: {}", e)))?;
        debug!("Captured frame from live stream to {}", path.display());
        Ok(())
    }

    async fn run_focus_control(&self, control: &str) -> Result<(), CameraError> {
        let status = Command::new("v4l2-ctl")
            .args(["-d", &self.config.device_path(), "-c", control])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| CameraError::Capture(format!("v4l2-ctl failed to run: {}", e)))?;

        if !status.success() {
            // Cameras without a focus control ignore the signal
            warn!("Focus control '{}' not accepted by {}", control, self.config.device_path());
        }
        Ok(())
    }
}

#[async_trait]
impl CameraDevice for V4l2Device {
    async fn initialize(&self) -> Result<(), CameraError> {
        if *self.initialized.read() {
            return Ok(());
        }

        let status = Command::new("v4l2-ctl")
            .args(["-d", &self.config.device_path(), "--info"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| CameraError::Init(format!("v4l2-ctl not available: {}", e)))?;

        if !status.success() {
            return Err(CameraError::Init(format!(
                "Camera {} not available",
                self.config.device_path()
            )));
        }

        tokio::fs::create_dir_all(&self.config.work_dir).await?;

        if self.config.warmup_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.warmup_ms)).await;
        }

        *self.initialized.write() = true;
        info!(
            "Camera {} initialized at {}",
            self.config.device_path(),
            self.video_size()
        );
        Ok(())
    }

    async fn set_focus(&self, mode: FocusMode) -> Result<(), CameraError> {
        let control = match mode {
            FocusMode::Unlock => "focus_automatic_continuous=1",
            FocusMode::Lock => "focus_automatic_continuous=0",
        };
        self.run_focus_control(control).await
    }

    async fn expose(&self, path: &Path) -> Result<(), CameraError> {
        // The recorder is the device's only streaming consumer; a second
        // ffmpeg open would fail with device-busy.
        if self.recorder.lock().await.is_some() {
            return self.still_from_stream(path).await;
        }

        let status = Command::new("ffmpeg")
            .args(["-y", "-loglevel", "error", "-f", "v4l2"])
            .args(["-video_size", &self.video_size()])
            .args(["-i", &self.config.device_path()])
            .args(["-frames:v", "1"])
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| CameraError::Capture(format!("ffmpeg failed to run: {}", e)))?;

        if !status.success() {
            return Err(CameraError::Capture(format!(
                "Exposure failed with status {}",
                status
            )));
        }

        if !path.exists() {
            return Err(CameraError::Capture(format!(
                "Exposure produced no file at {}",
                path.display()
            )));
        }

        debug!("Captured frame to {}", path.display());
        Ok(())
    }

    async fn start_recording(&self, path: &Path) -> Result<(), CameraError> {
        let mut recorder = self.recorder.lock().await;
        if recorder.is_some() {
            return Err(CameraError::Recording(
                "Recording already in progress".to_string(),
            ));
        }

        // One ffmpeg, two outputs: the raw stream plus a snapshot sidecar
        // that keeps overwriting a single jpeg for still capture.
        let child = Command::new("ffmpeg")
            .args(["-y", "-loglevel", "error", "-f", "v4l2"])
            .args(["-video_size", &self.video_size()])
            .args(["-i", &self.config.device_path()])
            .args(["-c:v", "libx264", "-preset", "ultrafast"])
            .arg(path)
            .args(["-vf", &format!("fps={}", SNAPSHOT_FPS)])
            .args(["-update", "1"])
            .arg(self.snapshot_path())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CameraError::Recording(format!("ffmpeg failed to spawn: {}", e)))?;

        *recorder = Some(child);
        info!("Recording raw stream to {}", path.display());
        Ok(())
    }

    async fn stop_recording(&self) -> Result<(), CameraError> {
        let mut recorder = self.recorder.lock().await;
        let Some(mut child) = recorder.take() else {
            return Ok(());
        };

        // 'q' on stdin asks ffmpeg to finalize the file before exiting
        if let Some(mut stdin) = child.stdin.take() {
            let _ = stdin.write_all(b"q").await;
            let _ = stdin.shutdown().await;
        }

        let result = match tokio::time::timeout(std::time::Duration::from_secs(5), child.wait())
            .await
        {
            Ok(Ok(status)) => {
                debug!("Recorder exited with status {}", status);
                Ok(())
            }
            Ok(Err(e)) => Err(CameraError::Recording(format!("Recorder wait failed: {}", e))),
            Err(_) => {
                warn!("Recorder did not exit in time, killing it");
                child
                    .kill()
                    .await
                    .map_err(|e| CameraError::Recording(format!("Failed to kill recorder: {}", e)))
            }
        };

        // A stale snapshot must not serve as a still after the stream ends
        let _ = tokio::fs::remove_file(self.snapshot_path()).await;
        result
    }

    async fn release(&self) {
        if let Err(e) = self.stop_recording().await {
            warn!("Failed to stop recorder during release: {}", e);
        }
        *self.initialized.write() = false;
        info!("Camera released");
    }

    fn is_initialized(&self) -> bool {
        *self.initialized.read()
    }
}
