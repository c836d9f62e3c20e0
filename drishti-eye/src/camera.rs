//! Still-frame capture with the two-phase autofocus protocol

use crate::config::CameraConfig;
use crate::device::{CameraDevice, FocusMode};
use crate::error::CameraError;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Handle to one captured still image
#[derive(Debug, Clone)]
pub struct Frame {
    pub id: Uuid,
    pub path: PathBuf,
    pub captured_at: DateTime<Utc>,
}

impl Frame {
    /// Release the on-disk image. Called by whoever consumed the frame.
    pub async fn discard(&self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            debug!("Failed to remove frame file {}: {}", self.path.display(), e);
        }
    }
}

/// Exclusive owner of the camera device handle.
///
/// Capture and recording start/stop share the same physical device and are
/// serialized on one internal lock so they never interleave at the hardware
/// level.
pub struct CameraManager {
    config: Arc<CameraConfig>,
    device: Arc<dyn CameraDevice>,
    hardware: tokio::sync::Mutex<()>,
    initialized: RwLock<bool>,
}

impl CameraManager {
    pub fn new(config: Arc<CameraConfig>, device: Arc<dyn CameraDevice>) -> Self {
        Self {
            config,
            device,
            hardware: tokio::sync::Mutex::new(()),
            initialized: RwLock::new(false),
        }
    }

    /// Initialize the camera once, at process start. Never re-initialized
    /// per capture; failure here is fatal to startup.
    pub async fn initialize(&self) -> Result<(), CameraError> {
        if *self.initialized.read() {
            return Ok(());
        }

        self.device.initialize().await?;
        *self.initialized.write() = true;
        info!("Camera manager ready");
        Ok(())
    }

    /// Capture one still frame.
    ///
    /// Runs the autofocus cycle before the exposure: unlock focus, wait the
    /// settle delay, lock focus, then expose. The settle delay is on the
    /// critical path of every capture.
    pub async fn capture_frame(&self) -> Result<Frame, CameraError> {
        if !*self.initialized.read() {
            return Err(CameraError::Capture("Camera not initialized".to_string()));
        }

        let _hw = self.hardware.lock().await;

        self.device.set_focus(FocusMode::Unlock).await?;
        tokio::time::sleep(std::time::Duration::from_millis(self.config.focus_settle_ms)).await;
        self.device.set_focus(FocusMode::Lock).await?;

        let id = Uuid::new_v4();
        let path = self.config.work_dir.join(format!("frame-{}.jpg", id));
        self.device.expose(&path).await?;

        Ok(Frame {
            id,
            path,
            captured_at: Utc::now(),
        })
    }

    /// Begin the raw recording stream. Serialized against capture.
    pub(crate) async fn begin_recording(&self, path: &Path) -> Result<(), CameraError> {
        if !*self.initialized.read() {
            return Err(CameraError::Recording("Camera not initialized".to_string()));
        }

        let _hw = self.hardware.lock().await;
        self.device.start_recording(path).await
    }

    /// Stop the raw recording stream. Serialized against capture.
    pub(crate) async fn end_recording(&self) -> Result<(), CameraError> {
        let _hw = self.hardware.lock().await;
        self.device.stop_recording().await
    }

    /// Release the device handle before process exit.
    pub async fn release(&self) {
        let _hw = self.hardware.lock().await;
        self.device.release().await;
        *self.initialized.write() = false;
    }

    pub fn is_initialized(&self) -> bool {
        *self.initialized.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedDevice {
        focus_signals: parking_lot::Mutex<Vec<FocusMode>>,
        exposures: AtomicUsize,
        initialized: RwLock<bool>,
    }

    impl ScriptedDevice {
        fn new() -> Self {
            Self {
                focus_signals: parking_lot::Mutex::new(Vec::new()),
                exposures: AtomicUsize::new(0),
                initialized: RwLock::new(false),
            }
        }
    }

    #[async_trait]
    impl CameraDevice for ScriptedDevice {
        async fn initialize(&self) -> Result<(), CameraError> {
            *self.initialized.write() = true;
            Ok(())
        }

        async fn set_focus(&self, mode: FocusMode) -> Result<(), CameraError> {
            self.focus_signals.lock().push(mode);
            Ok(())
        }

        async fn expose(&self, path: &Path) -> Result<(), CameraError> {
            self.exposures.fetch_add(1, Ordering::SeqCst);
            tokio::fs::write(path, b"jpeg").await?;
            Ok(())
        }

        async fn start_recording(&self, _path: &Path) -> Result<(), CameraError> {
            Ok(())
        }

        async fn stop_recording(&self) -> Result<(), CameraError> {
            Ok(())
        }

        async fn release(&self) {
            *self.initialized.write() = false;
        }

        fn is_initialized(&self) -> bool {
            *self.initialized.read()
        }
    }

    fn test_config(dir: &Path) -> Arc<CameraConfig> {
        Arc::new(CameraConfig {
            focus_settle_ms: 0,
            warmup_ms: 0,
            work_dir: dir.to_path_buf(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_capture_runs_unlock_then_lock() {
        let dir = tempfile::tempdir().unwrap();
        let device = Arc::new(ScriptedDevice::new());
        let manager = CameraManager::new(test_config(dir.path()), device.clone());

        manager.initialize().await.unwrap();
        let frame = manager.capture_frame().await.unwrap();

        assert_eq!(
            *device.focus_signals.lock(),
            vec![FocusMode::Unlock, FocusMode::Lock]
        );
        assert_eq!(device.exposures.load(Ordering::SeqCst), 1);
        assert!(frame.path.exists());
    }

    #[tokio::test]
    async fn test_capture_before_initialize_fails() {
        let dir = tempfile::tempdir().unwrap();
        let device = Arc::new(ScriptedDevice::new());
        let manager = CameraManager::new(test_config(dir.path()), device);

        assert!(manager.capture_frame().await.is_err());
    }

    #[tokio::test]
    async fn test_discard_removes_frame_file() {
        let dir = tempfile::tempdir().unwrap();
        let device = Arc::new(ScriptedDevice::new());
        let manager = CameraManager::new(test_config(dir.path()), device);

        manager.initialize().await.unwrap();
        let frame = manager.capture_frame().await.unwrap();
        assert!(frame.path.exists());
        frame.discard().await;
        assert!(!frame.path.exists());
    }

    #[tokio::test]
    async fn test_release_marks_uninitialized() {
        let dir = tempfile::tempdir().unwrap();
        let device = Arc::new(ScriptedDevice::new());
        let manager = CameraManager::new(test_config(dir.path()), device.clone());

        manager.initialize().await.unwrap();
        manager.release().await;
        assert!(!manager.is_initialized());
        assert!(!device.is_initialized());
    }
}
