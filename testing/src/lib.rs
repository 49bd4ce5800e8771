//! # Launchpad Testing
//!
//! Testing utilities and mock services for Launchpad.
//!
//! This crate provides:
//! - [`MockHttpClient`]: scripted replies and a request log
//! - Recording implementations of every runtime service trait
//! - Stage handlers that record or fail, and an [`EventRecorder`] for the bus
//! - [`test_config`], [`init_test_tracing`], and a [`LogCapture`] for asserting on logs
//!
//! ## Example
//!
//! ```ignore
//! use launchpad_runtime::{App, InitializeOptions, Services};
//! use launchpad_testing::{EventRecorder, MockAnalyticsService, MockAuthService, MockHttpClient};
//!
//! #[tokio::test]
//! async fn test_ready() {
//!     let mut app = App::new();
//!     app.set_config(launchpad_testing::test_config())?;
//!     let recorder = EventRecorder::attach(&app);
//!
//!     app.initialize(InitializeOptions::new().with_services(services)).await;
//!
//!     assert_eq!(recorder.count("APP.READY"), 1);
//! }
//! ```

use launchpad_core::AppConfig;
use launchpad_core::config::{ENV_KEYS, ENVIRONMENT, SECURE_COOKIES};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod http_mocks;
pub mod lifecycle_mocks;
pub mod log_capture;
pub mod service_mocks;

pub use http_mocks::{MockHttpClient, RecordedRequest};
pub use lifecycle_mocks::{EventRecorder, FailingHandler, RecordingHandler, StageLog};
pub use log_capture::LogCapture;
pub use service_mocks::{
    API_CLIENT_CREATED, Identity, MockAnalyticsService, MockAuthService, MockI18nService,
    RecordingLoggingService,
};

/// Base URL of the identity provider in [`test_config`].
pub const TEST_LMS_BASE_URL: &str = "http://localhost:18000";

/// A complete configuration for a local test environment.
///
/// Every key is set, so [`AppConfig::validate`] passes.
#[must_use]
pub fn test_config() -> AppConfig {
    let mut config: AppConfig = ENV_KEYS
        .iter()
        .map(|&key| (key.to_string(), Value::String(test_value(key).to_string())))
        .collect();
    config.insert(ENVIRONMENT, "test");
    config.insert(SECURE_COOKIES, true);
    config
}

fn test_value(key: &str) -> &'static str {
    match key {
        "ACCESS_TOKEN_COOKIE_NAME" => "edx-jwt-cookie-header-payload",
        "BASE_URL" => "localhost:1995",
        "CREDENTIALS_BASE_URL" => "http://localhost:18150",
        "CSRF_COOKIE_NAME" => "csrftoken",
        "CSRF_TOKEN_API_PATH" => "/csrf/api/v1/token",
        "ECOMMERCE_BASE_URL" => "http://localhost:18130",
        "LANGUAGE_PREFERENCE_COOKIE_NAME" => "openedx-language-preference",
        "LMS_BASE_URL" => TEST_LMS_BASE_URL,
        "LOGIN_URL" => "http://localhost:18000/login",
        "LOGOUT_URL" => "http://localhost:18000/logout",
        "MARKETING_SITE_BASE_URL" => "http://localhost:18000",
        "ORDER_HISTORY_URL" => "localhost:1996/orders",
        "REFRESH_ACCESS_TOKEN_ENDPOINT" => "http://localhost:18000/login_refresh",
        "SEGMENT_KEY" => "segment_whoa",
        "SITE_NAME" => "Launchpad",
        "USER_INFO_COOKIE_NAME" => "edx-user-info",
        _ => "",
    }
}

/// Install a `tracing` subscriber for tests.
///
/// Honors `RUST_LOG`, defaulting to `warn`. Output goes through the test
/// harness so it is only shown for failing tests. Safe to call from every
/// test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_core::config::LMS_BASE_URL;

    #[test]
    fn test_config_is_complete() {
        let config = test_config();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.get_str(LMS_BASE_URL), Some(TEST_LMS_BASE_URL));
        assert_eq!(config.get_bool(SECURE_COOKIES), Some(true));
    }

    #[test]
    fn test_tracing_init_is_idempotent() {
        init_test_tracing();
        init_test_tracing();
        tracing::debug!("still installed");
    }
}
