// Channel and wire error types
// Wire errors follow JSON-RPC 2.0 error codes

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error object carried on the wire when the responder cannot answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProtocolError {
    /// Error code (JSON-RPC standard codes)
    pub code: i32,
    /// Human-readable error message
    pub message: String,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "protocol error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Parse error (-32700)
    /// Payload was not valid JSON
    pub fn parse_error() -> Self {
        Self::new(-32700, "Parse error")
    }

    /// Invalid request (-32600)
    /// Valid JSON, but not a known request
    pub fn invalid_request() -> Self {
        Self::new(-32600, "Invalid Request")
    }

    /// Internal error (-32603)
    pub fn internal_error(details: impl Into<String>) -> Self {
        Self::new(-32603, format!("Internal error: {}", details.into()))
    }
}

/// Failure of a request/response round trip
///
/// Every variant is transient from the caller's point of view: the caller
/// keeps its previous state and surfaces a notice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The responder side is gone
    #[error("message channel closed")]
    Closed,

    /// No reply within the configured timeout
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The responder answered with an error object
    #[error("responder error: {0}")]
    Remote(ProtocolError),

    /// Payload could not be encoded or decoded
    #[error("codec error: {0}")]
    Codec(String),

    /// The responder answered with a response of the wrong kind
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<serde_json::Error> for ChannelError {
    fn from(error: serde_json::Error) -> Self {
        ChannelError::Codec(error.to_string())
    }
}

impl From<ProtocolError> for ChannelError {
    fn from(error: ProtocolError) -> Self {
        ChannelError::Remote(error)
    }
}
