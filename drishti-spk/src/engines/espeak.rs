//! espeak-ng engine, reached via command line

use crate::config::SpeechConfig;
use crate::engines::TtsEngine;
use crate::error::SpeechError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info};

/// espeak-ng spoken directly to the audio device. The process exits when
/// playback finishes, which gives the blocking-playback guarantee.
pub struct EspeakEngine {
    config: Arc<SpeechConfig>,
    available: RwLock<bool>,
}

impl EspeakEngine {
    /// Probe the engine at startup. Failure here is a fatal
    /// device-initialization error.
    pub fn new(config: Arc<SpeechConfig>) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;
        Self::probe(&config.command)?;
        info!("TTS engine '{}' initialized", config.command);
        Ok(Self {
            config,
            available: RwLock::new(true),
        })
    }

    fn probe(command: &str) -> Result<(), SpeechError> {
        let status = std::process::Command::new(command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| SpeechError::Init(format!("{} not available: {}", command, e)))?;

        if !status.success() {
            return Err(SpeechError::Init(format!(
                "{} --version exited with {}",
                command, status
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TtsEngine for EspeakEngine {
    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        if !*self.available.read() {
            return Err(SpeechError::Engine("Engine unavailable".to_string()));
        }

        let status = Command::new(&self.config.command)
            .args(["-v", &self.config.voice])
            .args(["-s", &self.config.rate_wpm.to_string()])
            .args(["-a", &self.config.amplitude.to_string()])
            .arg(text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                *self.available.write() = false;
                SpeechError::Engine(format!("{} failed to run: {}", self.config.command, e))
            })?;

        if !status.success() {
            *self.available.write() = false;
            return Err(SpeechError::Engine(format!(
                "{} exited with {}",
                self.config.command, status
            )));
        }

        debug!("Spoke {} chars", text.len());
        Ok(())
    }

    async fn reinitialize(&self) -> Result<(), SpeechError> {
        let command = self.config.command.clone();
        let probed = tokio::task::spawn_blocking(move || Self::probe(&command))
            .await
            .map_err(|e| SpeechError::Engine(format!("Probe task failed: {}", e)))?;

        probed?;
        *self.available.write() = true;
        info!("TTS engine '{}' re-initialized", self.config.command);
        Ok(())
    }

    fn is_available(&self) -> bool {
        *self.available.read()
    }

    fn name(&self) -> &str {
        "espeak"
    }
}
