//! Error types for the application runtime.

use launchpad_api::RequestError;
use launchpad_core::CoreError;
use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors raised while bootstrapping or using the application context.
///
/// Any of these can end up in [`App::error`](crate::App::error) when a
/// lifecycle stage fails.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AppError {
    /// A write-once field was read before it was set.
    #[error("App.{0} has not been initialized. Are you calling it too early?")]
    NotInitialized(&'static str),

    /// A write-once field was set twice.
    #[error("App.{0} has already been initialized")]
    AlreadyInitialized(&'static str),

    /// Configuration is missing or malformed.
    #[error(transparent)]
    Config(#[from] CoreError),

    /// A request made during bootstrap failed.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// An external service reported a failure.
    #[error("{service} service failed: {message}")]
    Service {
        /// Service name (`auth`, `i18n`, ...)
        service: &'static str,
        /// Failure description
        message: String,
    },

    /// A stage needs a service that was not supplied.
    #[error("No {0} service was provided")]
    MissingService(&'static str),

    /// The location could not be parsed as a URL.
    #[error("Invalid location {url}: {reason}")]
    InvalidLocation {
        /// Rejected input
        url: String,
        /// Parser message
        reason: String,
    },

    /// A stage handler failed for its own reasons.
    #[error("{stage} failed: {message}")]
    Stage {
        /// Stage or handler name
        stage: String,
        /// Failure description
        message: String,
    },
}

impl AppError {
    /// Shorthand for [`AppError::Service`].
    #[must_use]
    pub fn service(service: &'static str, message: impl Into<String>) -> Self {
        Self::Service {
            service,
            message: message.into(),
        }
    }

    /// Shorthand for [`AppError::Stage`].
    #[must_use]
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_initialized_message() {
        assert_eq!(
            AppError::NotInitialized("config").to_string(),
            "App.config has not been initialized. Are you calling it too early?"
        );
    }

    #[test]
    fn test_config_error_is_transparent() {
        let error = AppError::from(CoreError::MissingConfig {
            key: "LMS_BASE_URL".to_string(),
            requester: "authentication".to_string(),
        });
        assert_eq!(
            error.to_string(),
            "App configuration error: LMS_BASE_URL is required by authentication."
        );
    }
}
