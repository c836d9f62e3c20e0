//! Speech synthesizer owning the audio-output device

use crate::engines::TtsEngine;
use crate::error::SpeechError;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Exclusive owner of the audio-output device.
///
/// Utterances play strictly one at a time; callers must await `speak`
/// before submitting the next utterance. After a fatal device error the
/// synthesizer attempts a single engine re-initialization before the next
/// utterance and keeps going either way.
pub struct SpeechSynthesizer {
    engine: Arc<dyn TtsEngine>,
    needs_reinit: RwLock<bool>,
}

impl SpeechSynthesizer {
    pub fn new(engine: Arc<dyn TtsEngine>) -> Self {
        Self {
            engine,
            needs_reinit: RwLock::new(false),
        }
    }

    /// Speak one utterance, blocking until playback completes.
    ///
    /// Empty or whitespace-only text is skipped without engaging the device.
    pub async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            debug!("Skipping blank utterance");
            return Ok(());
        }

        if *self.needs_reinit.read() {
            // Single attempt; a failed re-init is logged and we try the
            // utterance anyway so transient engine states can clear.
            *self.needs_reinit.write() = false;
            if let Err(e) = self.engine.reinitialize().await {
                warn!("Engine re-initialization failed: {}", e);
            }
        }

        match self.engine.speak(text).await {
            Ok(()) => Ok(()),
            Err(e) => {
                if e.is_device_fatal() {
                    *self.needs_reinit.write() = true;
                }
                Err(e)
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_available()
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }
}
