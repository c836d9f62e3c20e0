//! drishti-spk: speech synthesis output
//!
//! Exclusive owner of the audio-output device. One utterance plays at a
//! time; `speak` blocks until playback completes so audio never overlaps.

pub mod config;
pub mod engines;
pub mod error;
pub mod synthesizer;

pub use config::{SpeechConfig, SpeechRetryConfig};
pub use engines::{EspeakEngine, TtsEngine};
pub use error::SpeechError;
pub use synthesizer::SpeechSynthesizer;
