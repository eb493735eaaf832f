//! Report error types.

use thiserror::Error;

/// Errors that can occur while encoding or decoding a run report
#[derive(Debug, Error)]
pub enum ReportError {
    /// Encoding the report to JSON failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Decoding a report from JSON failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),
}
