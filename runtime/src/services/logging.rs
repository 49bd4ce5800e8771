//! Logging service contract.

use crate::error::Result;
use serde_json::Value;

/// Application logging service.
///
/// Stage handlers report through this trait rather than `tracing` directly so
/// an application can forward bootstrap failures to its own log sink.
pub trait LoggingService: Send + Sync {
    /// Prepare the sink. Called once, during the logging stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot be prepared.
    fn configure(&self) -> Result<()> {
        Ok(())
    }

    /// Record an informational message with structured attributes.
    fn log_info(&self, message: &str, attributes: &Value);

    /// Record an error message with structured attributes.
    fn log_error(&self, message: &str, attributes: &Value);
}

/// [`LoggingService`] that forwards to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLoggingService;

impl LoggingService for TracingLoggingService {
    fn configure(&self) -> Result<()> {
        tracing::debug!("Logging through tracing");
        Ok(())
    }

    fn log_info(&self, message: &str, attributes: &Value) {
        tracing::info!(%attributes, "{message}");
    }

    fn log_error(&self, message: &str, attributes: &Value) {
        tracing::error!(%attributes, "{message}");
    }
}
