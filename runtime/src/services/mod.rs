//! External service collaborators.
//!
//! Each lifecycle stage talks to one service through a trait defined here.
//! The runtime only relies on the documented call/return contract; what a
//! service does internally (token refresh, catalog lookups, analytics wire
//! formats) is its own business.
//!
//! All traits are dyn-compatible so services can be stored as `Arc<dyn _>`
//! on the application context.

use crate::error::{AppError, Result};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub mod analytics;
pub mod auth;
pub mod i18n;
pub mod logging;

pub use analytics::{AnalyticsService, AnalyticsSettings};
pub use auth::{AuthService, AuthSession, AuthSettings};
pub use i18n::{I18nService, Messages, merge_messages};
pub use logging::{LoggingService, TracingLoggingService};

/// Future returned by async service methods.
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// The set of services available to stage handlers.
///
/// Every service is optional. Stages that need a missing service fail with
/// [`AppError::MissingService`], except logging, which falls back to
/// [`TracingLoggingService`].
#[derive(Clone, Default)]
pub struct Services {
    /// Authentication service.
    pub auth: Option<Arc<dyn AuthService>>,

    /// Internationalization service.
    pub i18n: Option<Arc<dyn I18nService>>,

    /// Logging service.
    pub logging: Option<Arc<dyn LoggingService>>,

    /// Analytics service.
    pub analytics: Option<Arc<dyn AnalyticsService>>,
}

impl Services {
    /// No services.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the authentication service.
    #[must_use]
    pub fn with_auth(mut self, auth: Arc<dyn AuthService>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the internationalization service.
    #[must_use]
    pub fn with_i18n(mut self, i18n: Arc<dyn I18nService>) -> Self {
        self.i18n = Some(i18n);
        self
    }

    /// Set the logging service.
    #[must_use]
    pub fn with_logging(mut self, logging: Arc<dyn LoggingService>) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Set the analytics service.
    #[must_use]
    pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsService>) -> Self {
        self.analytics = Some(analytics);
        self
    }

    /// The authentication service.
    ///
    /// # Errors
    ///
    /// [`AppError::MissingService`] if none was supplied.
    pub fn auth(&self) -> Result<Arc<dyn AuthService>> {
        self.auth.clone().ok_or(AppError::MissingService("auth"))
    }

    /// The internationalization service.
    ///
    /// # Errors
    ///
    /// [`AppError::MissingService`] if none was supplied.
    pub fn i18n(&self) -> Result<Arc<dyn I18nService>> {
        self.i18n.clone().ok_or(AppError::MissingService("i18n"))
    }

    /// The analytics service.
    ///
    /// # Errors
    ///
    /// [`AppError::MissingService`] if none was supplied.
    pub fn analytics(&self) -> Result<Arc<dyn AnalyticsService>> {
        self.analytics
            .clone()
            .ok_or(AppError::MissingService("analytics"))
    }

    /// The logging service, or [`TracingLoggingService`] if none was supplied.
    #[must_use]
    pub fn logging(&self) -> Arc<dyn LoggingService> {
        self.logging
            .clone()
            .unwrap_or_else(|| Arc::new(TracingLoggingService))
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("auth", &self.auth.is_some())
            .field("i18n", &self.i18n.is_some())
            .field("logging", &self.logging.is_some())
            .field("analytics", &self.analytics.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_services() {
        let services = Services::new();
        assert_eq!(services.auth().err(), Some(AppError::MissingService("auth")));
        assert_eq!(services.i18n().err(), Some(AppError::MissingService("i18n")));
        assert_eq!(
            services.analytics().err(),
            Some(AppError::MissingService("analytics"))
        );
    }
}
