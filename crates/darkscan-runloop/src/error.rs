//! Error types for the scheduler.

use thiserror::Error;

/// Errors that can occur while driving scans.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The change loop was started twice.
    #[error("Scheduler loop is already running")]
    AlreadyRunning,

    /// The change channel closed while the loop was running.
    #[error("Change channel closed")]
    ChannelClosed,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;
