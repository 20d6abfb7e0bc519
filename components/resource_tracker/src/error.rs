//! Reasons a completion event does not produce a record

use thiserror::Error;

/// Why a completed request was dropped instead of logged
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// The URL could not be parsed
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request belongs to the extension itself
    #[error("excluded self-instrumentation request: {0}")]
    Excluded(String),
}
