//! drishti-eye: camera capture and session recording
//!
//! Exclusive owner of the capture device. Still-frame capture runs an
//! explicit two-phase autofocus protocol (unlock, settle, lock, expose);
//! continuous recording shares the same device handle and is serialized
//! against capture at the hardware level.

pub mod camera;
pub mod config;
pub mod device;
pub mod error;
pub mod recording;

pub use camera::{CameraManager, Frame};
pub use config::{CameraConfig, RecordingConfig};
pub use device::{CameraDevice, FocusMode, V4l2Device};
pub use error::CameraError;
pub use recording::{RecordingController, RecordingState};
