//! drishti-pipeline: the perception-to-speech loop
//!
//! Three decoupled stages connected by bounded queues:
//!
//! Capture -> frame queue (capacity 1, producer blocks when full)
//!         -> Process (remote detection, utterance formatting)
//!         -> speech queue (capacity 5, new utterances dropped when full)
//!         -> Speak (sequential playback with bounded retry)
//!
//! Each stage runs as an independent tokio task under the orchestrator,
//! which owns startup, supervision, and cooperative shutdown.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod queues;
pub mod utterance;

mod capture;
mod process;
mod speech;

pub use config::{DrishtiConfig, PipelineConfig};
pub use error::PipelineError;
pub use orchestrator::{Orchestrator, PipelineState};
pub use queues::{PipelineQueues, QueuePolicy};
pub use utterance::{Utterance, API_ERROR_UTTERANCE};
