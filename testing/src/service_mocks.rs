//! Recording implementations of the runtime service traits.
//!
//! Each mock records the calls it receives so tests can assert on them
//! after [`App::initialize`](launchpad_runtime::App::initialize) returns.
//! Clones share their recordings.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use crate::http_mocks::MockHttpClient;
use launchpad_api::HttpClient;
use launchpad_core::{AppConfig, AuthenticatedUser};
use launchpad_runtime::services::ServiceFuture;
use launchpad_runtime::{
    AnalyticsService, AnalyticsSettings, AppError, AuthService, AuthSession, AuthSettings,
    I18nService, LoggingService, Result,
};
use serde_json::{Value, json};
use std::sync::{Arc, RwLock};

/// [`AuthService`] handing out a [`MockHttpClient`] and a fixed session.
#[derive(Clone, Debug)]
pub struct MockAuthService {
    client: MockHttpClient,
    session: AuthSession,
    settings: Arc<RwLock<Vec<AuthSettings>>>,
    session_paths: Arc<RwLock<Vec<String>>>,
    login_redirects: Arc<RwLock<Vec<String>>>,
}

impl MockAuthService {
    /// Anonymous visitor; API requests go to `client`.
    #[must_use]
    pub fn new(client: MockHttpClient) -> Self {
        Self {
            client,
            session: AuthSession::anonymous(),
            settings: Arc::new(RwLock::new(Vec::new())),
            session_paths: Arc::new(RwLock::new(Vec::new())),
            login_redirects: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Sign `user` in.
    #[must_use]
    pub fn with_user(mut self, user: AuthenticatedUser) -> Self {
        self.session.user = Some(user);
        self
    }

    /// Resolve to `session`.
    #[must_use]
    pub fn with_session(mut self, session: AuthSession) -> Self {
        self.session = session;
        self
    }

    /// The client handed out by [`AuthService::api_client`].
    #[must_use]
    pub const fn client(&self) -> &MockHttpClient {
        &self.client
    }

    /// Settings passed to [`AuthService::api_client`]. Each call also logs
    /// [`API_CLIENT_CREATED`] through the logging service it was given.
    #[must_use]
    pub fn settings(&self) -> Vec<AuthSettings> {
        self.settings.read().unwrap().clone()
    }

    /// Paths passed to [`AuthService::authenticated_session`].
    #[must_use]
    pub fn session_paths(&self) -> Vec<String> {
        self.session_paths.read().unwrap().clone()
    }

    /// Redirect URLs passed to [`AuthService::login`].
    #[must_use]
    pub fn login_redirects(&self) -> Vec<String> {
        self.login_redirects.read().unwrap().clone()
    }
}

/// Message the mock logs when [`AuthService::api_client`] builds a client.
pub const API_CLIENT_CREATED: &str = "API client created";

impl AuthService for MockAuthService {
    fn api_client(
        &self,
        settings: &AuthSettings,
        logging: Arc<dyn LoggingService>,
    ) -> Result<Arc<dyn HttpClient>> {
        self.settings.write().unwrap().push(settings.clone());
        logging.log_info(
            API_CLIENT_CREATED,
            &json!({ "authBaseUrl": settings.auth_base_url }),
        );
        Ok(Arc::new(self.client.clone()))
    }

    fn authenticated_session(&self, path: &str) -> ServiceFuture<'_, AuthSession> {
        self.session_paths.write().unwrap().push(path.to_string());
        let session = self.session.clone();
        Box::pin(async move { Ok(session) })
    }

    fn login(&self, redirect_url: &str) -> ServiceFuture<'_, ()> {
        self.login_redirects
            .write()
            .unwrap()
            .push(redirect_url.to_string());
        Box::pin(async { Ok(()) })
    }
}

/// [`I18nService`] recording the catalogs it is given.
#[derive(Clone, Debug, Default)]
pub struct MockI18nService {
    configured: Arc<RwLock<Vec<(AppConfig, Value)>>>,
    failure: Option<String>,
}

impl MockI18nService {
    /// Service accepting every catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Service rejecting every catalog with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Catalogs passed to [`I18nService::configure`], with the configuration.
    #[must_use]
    pub fn configured(&self) -> Vec<(AppConfig, Value)> {
        self.configured.read().unwrap().clone()
    }
}

impl I18nService for MockI18nService {
    fn configure(&self, config: &AppConfig, messages: &Value) -> Result<()> {
        self.configured
            .write()
            .unwrap()
            .push((config.clone(), messages.clone()));
        match &self.failure {
            Some(message) => Err(AppError::service("i18n", message.clone())),
            None => Ok(()),
        }
    }
}

/// [`LoggingService`] keeping every message in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingLoggingService {
    configured: Arc<RwLock<usize>>,
    infos: Arc<RwLock<Vec<(String, Value)>>>,
    errors: Arc<RwLock<Vec<(String, Value)>>>,
}

impl RecordingLoggingService {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times [`LoggingService::configure`] ran.
    #[must_use]
    pub fn configure_count(&self) -> usize {
        *self.configured.read().unwrap()
    }

    /// Informational messages with their attributes.
    #[must_use]
    pub fn infos(&self) -> Vec<(String, Value)> {
        self.infos.read().unwrap().clone()
    }

    /// Error messages with their attributes.
    #[must_use]
    pub fn errors(&self) -> Vec<(String, Value)> {
        self.errors.read().unwrap().clone()
    }
}

impl LoggingService for RecordingLoggingService {
    fn configure(&self) -> Result<()> {
        *self.configured.write().unwrap() += 1;
        Ok(())
    }

    fn log_info(&self, message: &str, attributes: &Value) {
        self.infos
            .write()
            .unwrap()
            .push((message.to_string(), attributes.clone()));
    }

    fn log_error(&self, message: &str, attributes: &Value) {
        self.errors
            .write()
            .unwrap()
            .push((message.to_string(), attributes.clone()));
    }
}

/// What [`MockAnalyticsService`] was asked to identify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// A signed-in user id.
    Authenticated(String),
    /// An anonymous visitor.
    Anonymous,
}

/// [`AnalyticsService`] recording settings, identities, and page events.
#[derive(Clone, Debug, Default)]
pub struct MockAnalyticsService {
    settings: Arc<RwLock<Vec<AnalyticsSettings>>>,
    identities: Arc<RwLock<Vec<Identity>>>,
    page_events: Arc<RwLock<usize>>,
}

impl MockAnalyticsService {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings passed to [`AnalyticsService::configure`].
    #[must_use]
    pub fn settings(&self) -> Vec<AnalyticsSettings> {
        self.settings.read().unwrap().clone()
    }

    /// Identify calls, oldest first.
    #[must_use]
    pub fn identities(&self) -> Vec<Identity> {
        self.identities.read().unwrap().clone()
    }

    /// Number of page events sent.
    #[must_use]
    pub fn page_event_count(&self) -> usize {
        *self.page_events.read().unwrap()
    }
}

impl AnalyticsService for MockAnalyticsService {
    fn configure(&self, settings: &AnalyticsSettings) -> Result<()> {
        self.settings.write().unwrap().push(settings.clone());
        Ok(())
    }

    fn identify_authenticated_user(&self, user_id: &str) -> ServiceFuture<'_, ()> {
        self.identities
            .write()
            .unwrap()
            .push(Identity::Authenticated(user_id.to_string()));
        Box::pin(async { Ok(()) })
    }

    fn identify_anonymous_user(&self) -> ServiceFuture<'_, ()> {
        self.identities.write().unwrap().push(Identity::Anonymous);
        Box::pin(async { Ok(()) })
    }

    fn send_page_event(&self) -> ServiceFuture<'_, ()> {
        *self.page_events.write().unwrap() += 1;
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i18n_failure() {
        let i18n = MockI18nService::failing("no catalog");
        let result = i18n.configure(&AppConfig::new(), &Value::Null);
        assert_eq!(result, Err(AppError::service("i18n", "no catalog")));
        assert_eq!(i18n.configured().len(), 1);
    }

    #[tokio::test]
    async fn test_auth_records_calls() {
        let auth = MockAuthService::new(MockHttpClient::new());
        let session = auth.authenticated_session("/dashboard").await;
        let _ = auth.login("http://localhost/dashboard").await;

        assert_eq!(session, Ok(AuthSession::anonymous()));
        assert_eq!(auth.session_paths(), vec!["/dashboard".to_string()]);
        assert_eq!(
            auth.login_redirects(),
            vec!["http://localhost/dashboard".to_string()]
        );
    }
}
