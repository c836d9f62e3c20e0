//! drishti-detect: remote detection/OCR client
//!
//! Uploads a captured frame to the detection service and returns the
//! structured result. The service is an opaque collaborator; this crate owns
//! only the wire contract, the timeout, and the error taxonomy.

pub mod client;
pub mod config;
pub mod error;
pub mod response;

pub use client::{Detector, HttpDetectionClient};
pub use config::DetectionConfig;
pub use error::DetectionError;
pub use response::DetectionResult;
