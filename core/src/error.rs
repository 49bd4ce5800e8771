//! Error types for core operations.

use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by configuration access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A configuration key needed by some component is absent.
    #[error("App configuration error: {key} is required by {requester}.")]
    MissingConfig {
        /// Missing key
        key: String,
        /// Component that asked for the key
        requester: String,
    },

    /// A configuration value exists but has the wrong shape.
    #[error("App configuration error: {key} {reason}")]
    InvalidConfig {
        /// Offending key
        key: String,
        /// What is wrong with it
        reason: String,
    },

    /// The configuration document has unset values.
    #[error("App configuration error: missing values for {}", .0.join(", "))]
    IncompleteConfig(Vec<String>),
}
