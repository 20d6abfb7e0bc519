//! Error types for the monitor component

use resource_types::ChannelError;
use thiserror::Error;

/// Errors that can occur in monitor lifecycle operations
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Background tasks are already running
    #[error("Monitor is already running")]
    AlreadyRunning,

    /// Background tasks have not been started
    #[error("Monitor is not running")]
    NotRunning,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Message channel failure
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Other errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;
