//! Error types for the filter engine

use resource_types::ChannelError;
use thiserror::Error;

/// Errors surfaced by [`FilterEngine`](crate::FilterEngine) operations
///
/// None of these are fatal; the engine keeps its previous state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Round trip to the tracker failed
    #[error("tracker unavailable: {0}")]
    Channel(#[from] ChannelError),

    /// No view entry at the requested position
    #[error("no resource at index {index} (view has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
