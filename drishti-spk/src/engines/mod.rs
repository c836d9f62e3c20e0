//! TTS engine implementations

pub mod espeak;

pub use espeak::EspeakEngine;

use crate::error::SpeechError;
use async_trait::async_trait;

/// Trait for TTS engines
#[async_trait]
pub trait TtsEngine: Send + Sync {
    /// Speak one utterance, blocking until playback completes
    async fn speak(&self, text: &str) -> Result<(), SpeechError>;

    /// Re-initialize the engine after a fatal device error
    async fn reinitialize(&self) -> Result<(), SpeechError>;

    /// Check if the engine is available
    fn is_available(&self) -> bool;

    /// Get engine name
    fn name(&self) -> &str;
}
