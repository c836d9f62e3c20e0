//! Speech worker
//!
//! Drains the speech queue sequentially. Playback is blocking, so no two
//! utterances ever overlap; a failed utterance is retried a bounded number
//! of times and then dropped without requeueing.

use crate::utterance::Utterance;
use drishti_core::{EventSink, PipelineEvent};
use drishti_spk::{SpeechRetryConfig, SpeechSynthesizer};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const RECV_POLL: Duration = Duration::from_millis(100);

pub(crate) async fn run_speech_worker(
    synthesizer: Arc<SpeechSynthesizer>,
    speech_rx: Arc<tokio::sync::Mutex<mpsc::Receiver<Utterance>>>,
    retry: SpeechRetryConfig,
    events: EventSink,
    running: Arc<RwLock<bool>>,
) {
    let mut speech_rx = speech_rx.lock().await;
    let pause = Duration::from_millis(retry.pause_ms);

    info!("Speech worker started");
    loop {
        if !*running.read() {
            break;
        }

        let utterance = match tokio::time::timeout(RECV_POLL, speech_rx.recv()).await {
            Ok(Some(utterance)) => utterance,
            Ok(None) => {
                debug!("Speech queue closed, stopping speech worker");
                break;
            }
            Err(_) => continue,
        };

        if utterance.is_blank() {
            debug!("Skipping blank utterance");
            continue;
        }

        // Bounded retry: attempt counter + fixed pause, then drop
        let mut attempt = 0;
        loop {
            attempt += 1;
            match synthesizer.speak(utterance.as_str()).await {
                Ok(()) => {
                    events.emit(PipelineEvent::UtteranceSpoken {
                        text: utterance.as_str().to_string(),
                    });
                    break;
                }
                Err(e) => {
                    warn!(
                        "Speech attempt {}/{} failed: {}",
                        attempt, retry.max_attempts, e
                    );
                    if attempt >= retry.max_attempts {
                        events.emit(PipelineEvent::SpeechFailed {
                            reason: e.to_string(),
                        });
                        break;
                    }
                    tokio::time::sleep(pause).await;
                    if !*running.read() {
                        break;
                    }
                }
            }
        }
    }
    info!("Speech worker stopped");
}
