//! Analytics service contract.

use super::ServiceFuture;
use crate::error::Result;
use launchpad_core::AppConfig;
use launchpad_core::config::{LMS_BASE_URL, SEGMENT_KEY};

/// Requester name used when analytics settings are pulled from configuration.
pub const ANALYTICS_REQUESTER: &str = "analytics";

/// Settings handed to the analytics service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsSettings {
    /// Write key of the analytics sink; analytics is disabled without one.
    pub segment_key: Option<String>,
    /// Base URL of the tracking API.
    pub api_base_url: String,
}

impl AnalyticsSettings {
    /// Pull analytics settings out of `config`.
    ///
    /// # Errors
    ///
    /// Fails if `LMS_BASE_URL` is missing.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            segment_key: config.get_str(SEGMENT_KEY).map(str::to_string),
            api_base_url: config
                .require_str(LMS_BASE_URL, ANALYTICS_REQUESTER)?
                .to_string(),
        })
    }
}

/// Analytics service.
pub trait AnalyticsService: Send + Sync {
    /// Set up the analytics sink. Called once, during the analytics stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink cannot be set up.
    fn configure(&self, settings: &AnalyticsSettings) -> Result<()>;

    /// Associate further events with `user_id`.
    fn identify_authenticated_user(&self, user_id: &str) -> ServiceFuture<'_, ()>;

    /// Associate further events with an anonymous visitor.
    fn identify_anonymous_user(&self) -> ServiceFuture<'_, ()>;

    /// Record a page view.
    fn send_page_event(&self) -> ServiceFuture<'_, ()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_key_is_optional() {
        let config = AppConfig::new().with(LMS_BASE_URL, "http://localhost:18000");
        assert_eq!(
            AnalyticsSettings::from_config(&config),
            Ok(AnalyticsSettings {
                segment_key: None,
                api_base_url: "http://localhost:18000".to_string(),
            })
        );
    }

    #[test]
    fn test_base_url_is_required() {
        assert!(AnalyticsSettings::from_config(&AppConfig::new()).is_err());
    }
}
