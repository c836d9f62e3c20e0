//! Best-effort pipeline event sink
//!
//! Workers notify the sink of success/failure events; delivery is
//! fire-and-forget. A sink with no subscribers discards events, and a slow
//! subscriber lags rather than blocking the pipeline.

use tokio::sync::broadcast;
use uuid::Uuid;

/// Observability events emitted by the pipeline workers
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    FrameCaptured { frame_id: Uuid },
    DetectionCompleted { objects: Vec<String>, text_len: usize },
    DetectionFailed { reason: String },
    UtteranceSpoken { text: String },
    UtteranceDropped { reason: String },
    SpeechFailed { reason: String },
    RecordingStarted,
    RecordingStopped,
}

/// Broadcast-backed event sink shared by all workers
#[derive(Debug, Clone)]
pub struct EventSink {
    sender: broadcast::Sender<PipelineEvent>,
}

impl EventSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.sender.subscribe()
    }

    /// Emit an event. Never blocks; a send with no receivers is not an error.
    pub fn emit(&self, event: PipelineEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventSink {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_without_subscribers_does_not_fail() {
        let sink = EventSink::default();
        sink.emit(PipelineEvent::RecordingStarted);
        assert_eq!(sink.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let sink = EventSink::new(8);
        let mut rx = sink.subscribe();
        sink.emit(PipelineEvent::DetectionFailed {
            reason: "timeout".to_string(),
        });
        match rx.recv().await.unwrap() {
            PipelineEvent::DetectionFailed { reason } => assert_eq!(reason, "timeout"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_full_sink_never_blocks_emitter() {
        let sink = EventSink::new(1);
        let _rx = sink.subscribe();
        // Second emit overwrites the lagging subscriber's slot instead of
        // blocking the emitting worker.
        sink.emit(PipelineEvent::RecordingStarted);
        sink.emit(PipelineEvent::RecordingStopped);
    }
}
