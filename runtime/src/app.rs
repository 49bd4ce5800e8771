//! The application context.
//!
//! [`App`] holds everything bootstrap produces: configuration, the API
//! client, the authenticated user, and the last error. Stage handlers receive
//! it as `&mut App` and fill it in as initialization progresses. Starting
//! over means building a fresh `App` (or calling [`App::reset`]).

use crate::error::{AppError, Result};
use crate::events::LifecycleEvent;
use crate::services::{Messages, Services};
use launchpad_api::{Api, HttpClient, Url};
use launchpad_core::bus::{PubSub, SubscriptionToken};
use launchpad_core::topics::APP_TOPIC;
use launchpad_core::{AppConfig, AuthenticatedUser};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Location used until the host application sets one.
pub const DEFAULT_LOCATION: &str = "http://localhost/";

/// Bus carrying lifecycle events.
pub type LifecycleBus = PubSub<LifecycleEvent>;

/// Application context shared by every stage handler.
pub struct App {
    config: Option<AppConfig>,
    api_client: Option<Arc<dyn HttpClient>>,
    location: Url,
    bus: Arc<LifecycleBus>,

    /// Signed-in user, set by the authentication stage.
    pub authenticated_user: Option<AuthenticatedUser>,

    /// Raw access-token claims, set by the authentication stage.
    pub decoded_access_token: Option<Value>,

    /// Error that stopped the last initialization run.
    pub error: Option<Arc<AppError>>,

    /// Application-specific fields passed to initialization.
    pub custom: Map<String, Value>,

    /// Message catalogs passed to initialization.
    pub messages: Messages,

    /// External services used by the default stage handlers.
    pub services: Services,

    /// Fetch account details for the signed-in user after authentication.
    pub hydrate_authenticated_user: bool,

    /// Let anonymous visitors through instead of redirecting them to login.
    pub allow_anonymous: bool,
}

impl App {
    /// Create an empty context with its own bus.
    #[must_use]
    pub fn new() -> Self {
        Self::with_bus(Arc::new(PubSub::new()))
    }

    /// Create an empty context publishing on `bus`.
    #[must_use]
    pub fn with_bus(bus: Arc<LifecycleBus>) -> Self {
        Self {
            config: None,
            api_client: None,
            location: default_location(),
            bus,
            authenticated_user: None,
            decoded_access_token: None,
            error: None,
            custom: Map::new(),
            messages: Messages::default(),
            services: Services::default(),
            hydrate_authenticated_user: false,
            allow_anonymous: false,
        }
    }

    /// The configuration.
    ///
    /// # Errors
    ///
    /// [`AppError::NotInitialized`] before the configuration stage ran.
    pub fn config(&self) -> Result<&AppConfig> {
        self.config.as_ref().ok_or(AppError::NotInitialized("config"))
    }

    /// Set the configuration. It can only be set once per context.
    ///
    /// # Errors
    ///
    /// [`AppError::AlreadyInitialized`] if it was already set.
    pub fn set_config(&mut self, config: AppConfig) -> Result<()> {
        if self.config.is_some() {
            return Err(AppError::AlreadyInitialized("config"));
        }
        self.config = Some(config);
        Ok(())
    }

    /// Pick `keys` out of the configuration on behalf of `requester`.
    ///
    /// # Errors
    ///
    /// [`AppError::NotInitialized`] before configuration, or
    /// [`AppError::Config`] naming the first missing key and `requester`.
    pub fn require_config(&self, keys: &[&str], requester: &str) -> Result<AppConfig> {
        Ok(self.config()?.require(keys, requester)?)
    }

    /// The API client.
    ///
    /// # Errors
    ///
    /// [`AppError::NotInitialized`] before the authentication stage ran.
    pub fn api_client(&self) -> Result<Arc<dyn HttpClient>> {
        self.api_client
            .clone()
            .ok_or(AppError::NotInitialized("apiClient"))
    }

    /// Set the API client. It can only be set once per context.
    ///
    /// # Errors
    ///
    /// [`AppError::AlreadyInitialized`] if it was already set.
    pub fn set_api_client(&mut self, client: Arc<dyn HttpClient>) -> Result<()> {
        if self.api_client.is_some() {
            return Err(AppError::AlreadyInitialized("apiClient"));
        }
        self.api_client = Some(client);
        Ok(())
    }

    /// Request wrapper over the API client.
    ///
    /// # Errors
    ///
    /// [`AppError::NotInitialized`] before the authentication stage ran.
    pub fn api(&self) -> Result<Api> {
        Ok(Api::new(self.api_client()?))
    }

    /// Current page location.
    #[must_use]
    pub const fn location(&self) -> &Url {
        &self.location
    }

    /// Set the current page location.
    ///
    /// # Errors
    ///
    /// [`AppError::InvalidLocation`] if `url` is not an absolute URL.
    pub fn set_location(&mut self, url: &str) -> Result<()> {
        self.location = Url::parse(url).map_err(|e| AppError::InvalidLocation {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    /// Query parameters of the current location. Repeated keys keep the last value.
    #[must_use]
    pub fn query_params(&self) -> BTreeMap<String, String> {
        self.location
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    /// The lifecycle bus.
    #[must_use]
    pub const fn bus(&self) -> &Arc<LifecycleBus> {
        &self.bus
    }

    /// Subscribe to `topic` (and its sub-topics) on the lifecycle bus.
    pub fn subscribe<F>(&self, topic: &str, callback: F) -> SubscriptionToken
    where
        F: Fn(&str, &LifecycleEvent) + Send + Sync + 'static,
    {
        self.bus.subscribe(topic, callback)
    }

    /// Publish `event` on its topic. Returns `true` if anyone was listening.
    pub fn publish(&self, event: &LifecycleEvent) -> bool {
        self.bus.publish(event.topic(), event)
    }

    /// Return the context to its pre-initialization state.
    ///
    /// Clears configuration, API client, user, token, and error, and drops
    /// every subscription under `APP`. Custom fields, messages, services, and
    /// location are kept.
    pub fn reset(&mut self) {
        self.config = None;
        self.api_client = None;
        self.error = None;
        self.authenticated_user = None;
        self.decoded_access_token = None;
        let dropped = self.bus.unsubscribe_topic(APP_TOPIC);
        tracing::debug!(dropped, "App reset");
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("api_client", &self.api_client.is_some())
            .field("location", &self.location.as_str())
            .field("authenticated_user", &self.authenticated_user)
            .field("error", &self.error)
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}

#[allow(clippy::expect_used)]
fn default_location() -> Url {
    Url::parse(DEFAULT_LOCATION).expect("hardcoded location should always parse")
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_core::topics::APP_READY;
    use std::sync::Mutex;

    #[test]
    fn test_config_before_set_fails() {
        let app = App::new();
        assert_eq!(app.config().err(), Some(AppError::NotInitialized("config")));
    }

    #[test]
    fn test_config_round_trip() {
        let mut app = App::new();
        let config = AppConfig::new().with("SITE_NAME", "Launchpad");

        assert_eq!(app.set_config(config.clone()), Ok(()));
        assert_eq!(app.config(), Ok(&config));
        assert_eq!(
            app.set_config(AppConfig::new()),
            Err(AppError::AlreadyInitialized("config"))
        );
    }

    #[test]
    fn test_api_client_before_set_fails() {
        let app = App::new();
        assert_eq!(app.api_client().err(), Some(AppError::NotInitialized("apiClient")));
        assert!(app.api().is_err());
    }

    #[test]
    fn test_require_config() {
        let mut app = App::new();
        assert_eq!(
            app.require_config(&["foo"], "tests").err(),
            Some(AppError::NotInitialized("config"))
        );

        let _ = app.set_config(AppConfig::new().with("foo", "bar"));
        assert!(app.require_config(&["foo"], "tests").is_ok());
        assert!(matches!(
            app.require_config(&["missing"], "tests"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_query_params() {
        let mut app = App::new();
        assert!(app.query_params().is_empty());

        let _ = app.set_location("http://localhost/path?foo=bar&baz=1&foo=last");
        let params = app.query_params();
        assert_eq!(params.get("foo").map(String::as_str), Some("last"));
        assert_eq!(params.get("baz").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_invalid_location() {
        let mut app = App::new();
        assert!(matches!(
            app.set_location("/relative"),
            Err(AppError::InvalidLocation { .. })
        ));
        assert_eq!(app.location().as_str(), DEFAULT_LOCATION);
    }

    #[test]
    fn test_reset_clears_state_and_subscriptions() {
        let mut app = App::new();
        let hits = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&hits);
        app.subscribe(APP_READY, move |_, _| {
            if let Ok(mut count) = sink.lock() {
                *count += 1;
            }
        });
        let _ = app.set_config(AppConfig::new());
        app.error = Some(Arc::new(AppError::stage("test", "boom")));
        app.authenticated_user = Some(AuthenticatedUser::new("1", "someone"));

        app.reset();

        assert!(app.config().is_err());
        assert!(app.error.is_none());
        assert!(app.authenticated_user.is_none());
        assert!(!app.publish(&LifecycleEvent::Ready));
        assert_eq!(hits.lock().map(|count| *count).ok(), Some(0));
    }
}
