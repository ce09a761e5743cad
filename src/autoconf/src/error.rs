//! Error types for the autoconfiguration pipeline

use thiserror::Error;

/// Autoconfiguration errors
#[derive(Debug, Error)]
pub enum AutoconfError {
    /// Malformed endpoint descriptor, identified by its handler id
    #[error("Invalid descriptor for handler '{handler}': {reason}")]
    InvalidDescriptor {
        /// Handler id of the offending descriptor
        handler: String,
        /// What was wrong with it
        reason: String,
    },

    /// Unparseable configuration option
    #[error("Invalid option '{option}': {reason}")]
    InvalidOption {
        /// Option name
        option: String,
        /// What was wrong with the value
        reason: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for autoconfiguration operations
pub type Result<T> = std::result::Result<T, AutoconfError>;
