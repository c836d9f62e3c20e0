//! Configuration for speech synthesis

use serde::{Deserialize, Serialize};

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// TTS command (espeak-ng or a compatible drop-in)
    pub command: String,

    /// Voice identifier passed to the engine
    pub voice: String,

    /// Speech rate in words per minute
    pub rate_wpm: u32,

    /// Output amplitude (0-200, espeak scale)
    pub amplitude: u32,

    /// Per-utterance retry policy
    pub retry: SpeechRetryConfig,
}

/// Bounded-retry policy for one utterance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechRetryConfig {
    /// Maximum synthesis attempts per utterance
    pub max_attempts: u32,

    /// Fixed pause between attempts, in milliseconds
    pub pause_ms: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            command: "espeak-ng".to_string(),
            voice: "en".to_string(),
            rate_wpm: 150,
            amplitude: 100,
            retry: SpeechRetryConfig::default(),
        }
    }
}

impl Default for SpeechRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            pause_ms: 1000,
        }
    }
}

impl SpeechConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.command.is_empty() {
            return Err("TTS command cannot be empty".to_string());
        }

        if self.voice.is_empty() {
            return Err("Voice cannot be empty".to_string());
        }

        if !(80..=500).contains(&self.rate_wpm) {
            return Err("Speech rate must be between 80 and 500 WPM".to_string());
        }

        if self.amplitude > 200 {
            return Err("Amplitude must be between 0 and 200".to_string());
        }

        self.retry.validate()
    }
}

impl SpeechRetryConfig {
    /// Validate retry configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("Max attempts must be greater than 0".to_string());
        }

        if self.max_attempts > 10 {
            return Err("Max attempts too large (max 10)".to_string());
        }

        if self.pause_ms > 60_000 {
            return Err("Retry pause too large (max 60000 ms)".to_string());
        }

        Ok(())
    }
}
