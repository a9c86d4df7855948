//! Error Types
//!
//! Errors raised while talking to the host debugging session or
//! preparing the image scratch space.

use thiserror::Error;

/// Errors produced by the tracker, the exporter and the configuration layer
#[derive(Error, Debug)]
pub enum ViewerError {
    // Host errors
    #[error("Host request '{command}' failed: {message}")]
    Host { command: String, message: String },

    #[error("No active debug session")]
    NoActiveSession,

    // Protocol errors
    #[error("Malformed '{command}' response: {reason}")]
    MalformedResponse { command: String, reason: String },

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    // Scratch space and configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ViewerError {
    /// Shortcut for a host round trip that came back with an error
    pub fn host(command: impl Into<String>, message: impl Into<String>) -> Self {
        ViewerError::Host {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Shortcut for a response missing the field we need
    pub fn malformed(command: impl Into<String>, reason: impl Into<String>) -> Self {
        ViewerError::MalformedResponse {
            command: command.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        ViewerError::DeserializationError(err.to_string())
    }
}

impl From<toml::de::Error> for ViewerError {
    fn from(err: toml::de::Error) -> Self {
        ViewerError::InvalidConfig(err.to_string())
    }
}

/// Result type alias for tracker and exporter operations
pub type ViewerResult<T> = Result<T, ViewerError>;
