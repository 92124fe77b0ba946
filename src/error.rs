use thiserror::Error;

/// Errors produced by the focus reader
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Settings storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// A message could not be delivered or was rejected by the receiver
    #[error("Messaging error: {0}")]
    Messaging(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Browser launch failed
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Navigation failed
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// DOM snapshot could not be parsed
    #[error("Failed to parse DOM: {0}")]
    DomParseFailed(String),

    /// Audio output could not be probed or unlocked
    #[error("Audio error: {0}")]
    Audio(String),

    /// JavaScript evaluation in the page failed
    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ReaderError>;
