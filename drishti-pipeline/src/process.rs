//! Process worker
//!
//! Drains the frame queue, invokes the remote detector, and derives the
//! utterance. A failed or malformed detection degrades to the fixed
//! fallback utterance; this worker never stalls the pipeline on a bad
//! remote response.

use crate::utterance::{fallback_utterance, utterance_for, Utterance};
use drishti_core::{EventSink, PipelineEvent};
use drishti_detect::Detector;
use drishti_eye::Frame;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

/// How often the worker wakes to recheck the shutdown flag while idle
const RECV_POLL: Duration = Duration::from_millis(100);

pub(crate) async fn run_process_worker(
    detector: Arc<dyn Detector>,
    frame_rx: Arc<tokio::sync::Mutex<mpsc::Receiver<Frame>>>,
    speech_tx: mpsc::Sender<Utterance>,
    events: EventSink,
    running: Arc<RwLock<bool>>,
) {
    // Held for the worker's lifetime; released if the task dies so a
    // supervised restart can reclaim the consuming end.
    let mut frame_rx = frame_rx.lock().await;

    info!("Process worker started");
    loop {
        if !*running.read() {
            break;
        }

        let frame = match tokio::time::timeout(RECV_POLL, frame_rx.recv()).await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                debug!("Frame queue closed, stopping process worker");
                break;
            }
            Err(_) => continue,
        };

        let utterance = match detector.detect(&frame).await {
            Ok(result) => {
                events.emit(PipelineEvent::DetectionCompleted {
                    objects: result.detected_objects.clone(),
                    text_len: result.extracted_text.len(),
                });
                utterance_for(&result)
            }
            Err(e) => {
                warn!("Detection failed for frame {}: {}", frame.id, e);
                events.emit(PipelineEvent::DetectionFailed {
                    reason: e.to_string(),
                });
                fallback_utterance()
            }
        };

        // Frame is consumed; release the on-disk image
        frame.discard().await;

        // Non-blocking push: freshness over completeness of the backlog
        match speech_tx.try_send(utterance) {
            Ok(()) => {}
            Err(TrySendError::Full(utterance)) => {
                debug!("Speech queue full, dropping utterance: {}", utterance.as_str());
                events.emit(PipelineEvent::UtteranceDropped {
                    reason: "speech queue full".to_string(),
                });
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Speech queue closed, stopping process worker");
                break;
            }
        }
    }
    info!("Process worker stopped");
}
