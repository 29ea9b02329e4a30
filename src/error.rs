//! Error types for simon-bridge

use thiserror::Error;

/// Errors that can occur in the pairing and telemetry bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Transport connection failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Transport is not connected; nothing was published
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),

    /// A pairing request is already in flight (single-slot protocol)
    #[error("Pairing already in progress for device '{0}'")]
    Busy(String),

    /// Publish failure
    #[error("Failed to publish to subject '{subject}': {reason}")]
    Publish {
        subject: String,
        reason: String,
    },

    /// Subscribe failure
    #[error("Failed to subscribe to subject '{subject}': {reason}")]
    Subscribe {
        subject: String,
        reason: String,
    },

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Score log read or write failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
