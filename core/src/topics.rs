//! Lifecycle topic constants.
//!
//! Every topic lives under [`APP_TOPIC`], so unsubscribing from `APP` removes
//! all lifecycle subscriptions at once.

/// Root topic for application lifecycle events.
pub const APP_TOPIC: &str = "APP";

/// Published after the before-init stage.
pub const APP_BEFORE_INIT: &str = "APP.BEFORE_INIT";

/// Published after configuration has been loaded.
pub const APP_CONFIGURED: &str = "APP.CONFIGURED";

/// Published after the user has been authenticated and the API client built.
pub const APP_AUTHENTICATED: &str = "APP.AUTHENTICATED";

/// Published after internationalization is configured.
pub const APP_I18N_CONFIGURED: &str = "APP.I18N_CONFIGURED";

/// Published after the logging service is configured.
pub const APP_LOGGING_CONFIGURED: &str = "APP.LOGGING_CONFIGURED";

/// Published after analytics is configured.
pub const APP_ANALYTICS_CONFIGURED: &str = "APP.ANALYTICS_CONFIGURED";

/// Published after the before-ready stage.
pub const APP_BEFORE_READY: &str = "APP.BEFORE_READY";

/// Published once initialization completed successfully.
pub const APP_READY: &str = "APP.READY";

/// Published instead of the remaining stages when a stage fails.
pub const APP_ERROR: &str = "APP.ERROR";

/// Published when the authenticated user record is enriched after login.
pub const APP_AUTHENTICATED_USER_CHANGED: &str = "APP.AUTHENTICATED_USER_CHANGED";

/// Stage completion topics in execution order.
pub const LIFECYCLE_TOPICS: [&str; 8] = [
    APP_BEFORE_INIT,
    APP_CONFIGURED,
    APP_AUTHENTICATED,
    APP_I18N_CONFIGURED,
    APP_LOGGING_CONFIGURED,
    APP_ANALYTICS_CONFIGURED,
    APP_BEFORE_READY,
    APP_READY,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics_share_app_prefix() {
        for topic in LIFECYCLE_TOPICS
            .iter()
            .chain([APP_ERROR, APP_AUTHENTICATED_USER_CHANGED].iter())
        {
            assert!(topic.starts_with("APP."), "{topic} is outside APP");
        }
    }
}
