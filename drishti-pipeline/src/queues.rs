//! Bounded queues connecting the pipeline stages
//!
//! Drop-vs-block is an explicit, named policy per queue:
//!
//! - frame queue: [`QueuePolicy::BlockProducerOnFull`] — the capture worker
//!   waits rather than overwriting the pending frame, so at most one frame
//!   is ever in flight.
//! - speech queue: [`QueuePolicy::DropNewOnFull`] — speech may fall behind
//!   reality without ever blocking detection; the newest utterance loses.

use crate::config::PipelineConfig;
use crate::utterance::Utterance;
use drishti_eye::Frame;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Behavior of a bounded queue when it is at capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueuePolicy {
    /// Producer suspends and retries until a slot frees up
    BlockProducerOnFull,
    /// New items are silently discarded; the producer never blocks
    DropNewOnFull,
}

pub const FRAME_QUEUE_POLICY: QueuePolicy = QueuePolicy::BlockProducerOnFull;
pub const SPEECH_QUEUE_POLICY: QueuePolicy = QueuePolicy::DropNewOnFull;

/// The two bounded channels owned by the orchestrator.
///
/// Receivers sit behind a mutex so a supervised worker restart can reclaim
/// its consuming end; each queue still has exactly one consumer at a time.
pub struct PipelineQueues {
    pub frame_tx: mpsc::Sender<Frame>,
    pub frame_rx: Arc<tokio::sync::Mutex<mpsc::Receiver<Frame>>>,
    pub speech_tx: mpsc::Sender<Utterance>,
    pub speech_rx: Arc<tokio::sync::Mutex<mpsc::Receiver<Utterance>>>,
}

impl PipelineQueues {
    pub fn new(config: &PipelineConfig) -> Self {
        let (frame_tx, frame_rx) = mpsc::channel(config.frame_queue_capacity);
        let (speech_tx, speech_rx) = mpsc::channel(config.speech_queue_capacity);
        Self {
            frame_tx,
            frame_rx: Arc::new(tokio::sync::Mutex::new(frame_rx)),
            speech_tx,
            speech_rx: Arc::new(tokio::sync::Mutex::new(speech_rx)),
        }
    }
}
