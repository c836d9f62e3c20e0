//! drishti-core: shared error type and pipeline event model
//!
//! Common ground for the Drishti workspace. Member crates define their own
//! error enums and convert into [`Error`] at the boundary; the event sink
//! carries best-effort observability events out of the pipeline.

pub mod error;
pub mod events;

pub use error::{Error, Result};
pub use events::{EventSink, PipelineEvent};
