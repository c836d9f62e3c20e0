//! Capture worker
//!
//! Produces frames into the frame queue at a bounded rate. Holds the only
//! reference to the camera besides the recording controller; the two are
//! serialized inside the camera manager.

use crate::config::PipelineConfig;
use drishti_core::{EventSink, PipelineEvent};
use drishti_eye::{CameraManager, Frame, RecordingController, RecordingState};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

pub(crate) async fn run_capture_worker(
    camera: Arc<CameraManager>,
    recorder: Arc<RecordingController>,
    frame_tx: mpsc::Sender<Frame>,
    events: EventSink,
    config: Arc<PipelineConfig>,
    running: Arc<RwLock<bool>>,
) {
    let poll = Duration::from_millis(config.frame_poll_ms);
    let interval = Duration::from_millis(config.capture_interval_ms);

    info!("Capture worker started");
    loop {
        if !*running.read() {
            break;
        }

        // Backpressure: a frame is still pending downstream, so do not
        // capture at all — recheck after the polling interval.
        if frame_tx.capacity() == 0 {
            tokio::time::sleep(poll).await;
            continue;
        }

        match camera.capture_frame().await {
            Ok(frame) => {
                start_recording_if_idle(&recorder, &events).await;
                events.emit(PipelineEvent::FrameCaptured { frame_id: frame.id });
                if !enqueue_frame(&frame_tx, frame, poll, &running).await {
                    break;
                }
            }
            Err(e) => {
                // Cycle skipped, loop continues
                warn!("Capture failed: {}", e);
            }
        }

        tokio::time::sleep(interval).await;
    }
    info!("Capture worker stopped");
}

/// Capture and persistent recording share the physical device, so recording
/// is started opportunistically here and never started twice.
async fn start_recording_if_idle(recorder: &RecordingController, events: &EventSink) {
    if recorder.state() != RecordingState::Idle {
        return;
    }
    match recorder.start().await {
        Ok(()) => {
            if recorder.state() == RecordingState::Recording {
                events.emit(PipelineEvent::RecordingStarted);
            }
        }
        Err(e) => warn!("Failed to start session recording: {}", e),
    }
}

/// Enqueue with the frame queue's block-producer-on-full policy: wait for
/// the slot, never overwrite the pending frame. Returns false when the
/// pipeline is shutting down or the queue is gone.
async fn enqueue_frame(
    frame_tx: &mpsc::Sender<Frame>,
    frame: Frame,
    poll: Duration,
    running: &Arc<RwLock<bool>>,
) -> bool {
    let mut pending = frame;
    loop {
        match frame_tx.try_send(pending) {
            Ok(()) => return true,
            Err(TrySendError::Full(frame)) => {
                pending = frame;
                if !*running.read() {
                    pending.discard().await;
                    return false;
                }
                tokio::time::sleep(poll).await;
            }
            Err(TrySendError::Closed(frame)) => {
                debug!("Frame queue closed, discarding frame {}", frame.id);
                frame.discard().await;
                return false;
            }
        }
    }
}
