//! Authentication service contract.

use super::{LoggingService, ServiceFuture};
use crate::error::Result;
use launchpad_api::HttpClient;
use launchpad_core::AppConfig;
use launchpad_core::config::{
    ACCESS_TOKEN_COOKIE_NAME, BASE_URL, CSRF_COOKIE_NAME, CSRF_TOKEN_API_PATH, LMS_BASE_URL,
    LOGIN_URL, LOGOUT_URL, REFRESH_ACCESS_TOKEN_ENDPOINT, USER_INFO_COOKIE_NAME,
};
use launchpad_core::user::AuthenticatedUser;
use serde_json::Value;
use std::sync::Arc;

/// Requester name used when auth settings are pulled from configuration.
pub const AUTH_REQUESTER: &str = "authentication";

/// Settings handed to the auth service when building the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    /// Public URL of the application.
    pub app_base_url: String,
    /// Base URL of the identity provider.
    pub auth_base_url: String,
    /// Login page.
    pub login_url: String,
    /// Logout page.
    pub logout_url: String,
    /// CSRF token endpoint path.
    pub csrf_token_api_path: String,
    /// Access token refresh endpoint.
    pub refresh_access_token_endpoint: String,
    /// Cookie carrying the access token.
    pub access_token_cookie_name: String,
    /// Cookie carrying cached user info.
    pub user_info_cookie_name: String,
    /// Cookie carrying the CSRF token.
    pub csrf_cookie_name: String,
}

impl AuthSettings {
    /// Pull every auth setting out of `config`.
    ///
    /// # Errors
    ///
    /// Fails on the first missing key, naming it and the `authentication` requester.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let get = |key: &str| -> Result<String> {
            Ok(config.require_str(key, AUTH_REQUESTER)?.to_string())
        };
        Ok(Self {
            app_base_url: get(BASE_URL)?,
            auth_base_url: get(LMS_BASE_URL)?,
            login_url: get(LOGIN_URL)?,
            logout_url: get(LOGOUT_URL)?,
            csrf_token_api_path: get(CSRF_TOKEN_API_PATH)?,
            refresh_access_token_endpoint: get(REFRESH_ACCESS_TOKEN_ENDPOINT)?,
            access_token_cookie_name: get(ACCESS_TOKEN_COOKIE_NAME)?,
            user_info_cookie_name: get(USER_INFO_COOKIE_NAME)?,
            csrf_cookie_name: get(CSRF_COOKIE_NAME)?,
        })
    }
}

/// Result of checking who is signed in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthSession {
    /// The signed-in user, or `None` for anonymous visitors.
    pub user: Option<AuthenticatedUser>,
    /// Raw claims of the access token, when there is one.
    pub decoded_access_token: Option<Value>,
}

impl AuthSession {
    /// Anonymous session.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user: None,
            decoded_access_token: None,
        }
    }
}

/// Authentication service.
///
/// Abstracts over whatever identity provider the application uses. The
/// authentication stage calls [`api_client`](Self::api_client) once, then
/// [`authenticated_session`](Self::authenticated_session), and
/// [`login`](Self::login) when an anonymous visitor is not allowed.
pub trait AuthService: Send + Sync {
    /// Build the authenticated HTTP client used for every API request.
    ///
    /// `logging` is the application's configured logging service; the client
    /// reports token refresh and request failures through it.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built from `settings`.
    fn api_client(
        &self,
        settings: &AuthSettings,
        logging: Arc<dyn LoggingService>,
    ) -> Result<Arc<dyn HttpClient>>;

    /// Resolve the signed-in user for a page at `path`.
    fn authenticated_session(&self, path: &str) -> ServiceFuture<'_, AuthSession>;

    /// Send the visitor to the login page, returning to `redirect_url` afterwards.
    fn login(&self, redirect_url: &str) -> ServiceFuture<'_, ()>;
}
