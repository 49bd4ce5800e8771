//! Environment-derived application configuration.
//!
//! Configuration is a flat map from upper-case keys to JSON values (strings
//! and booleans). It is read once at startup and stored on the application
//! context. A key that maps to `null` counts as unset.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Cookie holding the JWT header and payload.
pub const ACCESS_TOKEN_COOKIE_NAME: &str = "ACCESS_TOKEN_COOKIE_NAME";
/// Public URL of the application itself.
pub const BASE_URL: &str = "BASE_URL";
/// Credentials service base URL.
pub const CREDENTIALS_BASE_URL: &str = "CREDENTIALS_BASE_URL";
/// Cookie holding the CSRF token.
pub const CSRF_COOKIE_NAME: &str = "CSRF_COOKIE_NAME";
/// Path of the CSRF token endpoint.
pub const CSRF_TOKEN_API_PATH: &str = "CSRF_TOKEN_API_PATH";
/// E-commerce service base URL.
pub const ECOMMERCE_BASE_URL: &str = "ECOMMERCE_BASE_URL";
/// Deployment environment name (`development`, `production`, ...).
pub const ENVIRONMENT: &str = "ENVIRONMENT";
/// Cookie holding the preferred language.
pub const LANGUAGE_PREFERENCE_COOKIE_NAME: &str = "LANGUAGE_PREFERENCE_COOKIE_NAME";
/// Base URL of the identity provider and account APIs.
pub const LMS_BASE_URL: &str = "LMS_BASE_URL";
/// Login page URL.
pub const LOGIN_URL: &str = "LOGIN_URL";
/// Logout page URL.
pub const LOGOUT_URL: &str = "LOGOUT_URL";
/// Marketing site base URL.
pub const MARKETING_SITE_BASE_URL: &str = "MARKETING_SITE_BASE_URL";
/// Order history page URL.
pub const ORDER_HISTORY_URL: &str = "ORDER_HISTORY_URL";
/// Endpoint used to refresh the access token.
pub const REFRESH_ACCESS_TOKEN_ENDPOINT: &str = "REFRESH_ACCESS_TOKEN_ENDPOINT";
/// Whether cookies must be marked secure. Derived from [`ENVIRONMENT`].
pub const SECURE_COOKIES: &str = "SECURE_COOKIES";
/// Analytics write key.
pub const SEGMENT_KEY: &str = "SEGMENT_KEY";
/// Human-readable site name.
pub const SITE_NAME: &str = "SITE_NAME";
/// Cookie holding cached user info.
pub const USER_INFO_COOKIE_NAME: &str = "USER_INFO_COOKIE_NAME";

/// Environment variable that selects [`ENVIRONMENT`].
pub const ENVIRONMENT_VAR: &str = "APP_ENV";

/// Keys read verbatim from environment variables of the same name.
pub const ENV_KEYS: [&str; 16] = [
    ACCESS_TOKEN_COOKIE_NAME,
    BASE_URL,
    CREDENTIALS_BASE_URL,
    CSRF_COOKIE_NAME,
    CSRF_TOKEN_API_PATH,
    ECOMMERCE_BASE_URL,
    LANGUAGE_PREFERENCE_COOKIE_NAME,
    LMS_BASE_URL,
    LOGIN_URL,
    LOGOUT_URL,
    MARKETING_SITE_BASE_URL,
    ORDER_HISTORY_URL,
    REFRESH_ACCESS_TOKEN_ENDPOINT,
    SEGMENT_KEY,
    SITE_NAME,
    USER_INFO_COOKIE_NAME,
];

/// Application configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppConfig {
    values: BTreeMap<String, Value>,
}

impl AppConfig {
    /// Create an empty configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    ///
    /// Every key in [`ENV_KEYS`] is present in the result; unset variables map
    /// to `null`. [`ENVIRONMENT`] comes from [`ENVIRONMENT_VAR`] and
    /// [`SECURE_COOKIES`] is `true` unless the environment is `development`.
    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();
        for key in ENV_KEYS {
            config.insert(key, lookup(key).map_or(Value::Null, Value::String));
        }

        let environment = lookup(ENVIRONMENT_VAR);
        let secure = environment.as_deref() != Some("development");
        config.insert(ENVIRONMENT, environment.map_or(Value::Null, Value::String));
        config.insert(SECURE_COOKIES, Value::Bool(secure));
        config
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key` to `value`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Value for `key`, or `None` when absent or `null`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|value| !value.is_null())
    }

    /// String value for `key`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Boolean value for `key`.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// String value for `key`.
    ///
    /// # Errors
    ///
    /// [`CoreError::MissingConfig`] when unset, [`CoreError::InvalidConfig`]
    /// when it is not a string.
    pub fn require_str(&self, key: &str, requester: &str) -> Result<&str> {
        let value = self.get(key).ok_or_else(|| missing(key, requester))?;
        value.as_str().ok_or_else(|| CoreError::InvalidConfig {
            key: key.to_string(),
            reason: format!("must be a string, found {value}"),
        })
    }

    /// Pick `keys` out of this configuration.
    ///
    /// # Errors
    ///
    /// Fails on the first key that is unset, naming it and `requester`.
    pub fn require(&self, keys: &[&str], requester: &str) -> Result<Self> {
        let mut picked = Self::new();
        for &key in keys {
            let value = self.get(key).ok_or_else(|| missing(key, requester))?;
            picked.insert(key, value.clone());
        }
        Ok(picked)
    }

    /// Check that no value is unset.
    ///
    /// # Errors
    ///
    /// [`CoreError::IncompleteConfig`] listing every unset key.
    pub fn validate(&self) -> Result<()> {
        let unset: Vec<String> = self
            .values
            .iter()
            .filter(|(_, value)| value.is_null())
            .map(|(key, _)| key.clone())
            .collect();
        if unset.is_empty() {
            Ok(())
        } else {
            Err(CoreError::IncompleteConfig(unset))
        }
    }

    /// Iterate over every key and value, including unset ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of keys, including unset ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the configuration has no keys at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn missing(key: &str, requester: &str) -> CoreError {
    CoreError::MissingConfig {
        key: key.to_string(),
        requester: requester.to_string(),
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AppConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (key, value) in iter {
            config.insert(key, value);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_source_reads_known_keys() {
        let config = AppConfig::from_source(source(&[
            (BASE_URL, "localhost:1995"),
            (LMS_BASE_URL, "http://localhost:18000"),
            (ENVIRONMENT_VAR, "production"),
        ]));

        assert_eq!(config.get_str(BASE_URL), Some("localhost:1995"));
        assert_eq!(config.get_str(LMS_BASE_URL), Some("http://localhost:18000"));
        assert_eq!(config.get_str(ENVIRONMENT), Some("production"));
        assert_eq!(config.get_bool(SECURE_COOKIES), Some(true));
        assert_eq!(config.get(SEGMENT_KEY), None);
        assert_eq!(config.len(), ENV_KEYS.len() + 2);
    }

    #[test]
    fn test_development_disables_secure_cookies() {
        let config = AppConfig::from_source(source(&[(ENVIRONMENT_VAR, "development")]));
        assert_eq!(config.get_bool(SECURE_COOKIES), Some(false));
    }

    #[test]
    fn test_require_picks_keys() {
        let config = AppConfig::new()
            .with("foo", "bar")
            .with("buh", "okay")
            .with("other", true);

        let picked = config.require(&["foo", "other"], "tests").unwrap_or_default();
        assert_eq!(picked, AppConfig::new().with("foo", "bar").with("other", true));
    }

    #[test]
    fn test_require_names_missing_key_and_requester() {
        let config = AppConfig::new().with("foo", "bar").with("buh", Value::Null);

        let error = config.require(&["foo", "buh"], "authentication");
        assert_eq!(
            error,
            Err(CoreError::MissingConfig {
                key: "buh".to_string(),
                requester: "authentication".to_string(),
            })
        );
        assert_eq!(
            error.map(|_| ()).unwrap_err().to_string(),
            "App configuration error: buh is required by authentication."
        );
    }

    #[test]
    fn test_require_str_rejects_non_strings() {
        let config = AppConfig::new().with("flag", true);
        assert!(matches!(
            config.require_str("flag", "tests"),
            Err(CoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_validate() {
        let complete = AppConfig::new().with("foo", "bar").with("buh", "okay");
        assert_eq!(complete.validate(), Ok(()));

        let incomplete = AppConfig::new().with("foo", "bar").with("buh", Value::Null);
        assert_eq!(
            incomplete.validate(),
            Err(CoreError::IncompleteConfig(vec!["buh".to_string()]))
        );
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let config = AppConfig::new().with("SITE_NAME", "Launchpad");
        assert_eq!(serde_json::to_value(&config).ok(), Some(json!({ "SITE_NAME": "Launchpad" })));
    }
}
