//! Typed lifecycle events published on the application bus.

use crate::error::AppError;
use crate::lifecycle::Stage;
use launchpad_core::topics::{
    APP_ANALYTICS_CONFIGURED, APP_AUTHENTICATED, APP_AUTHENTICATED_USER_CHANGED,
    APP_BEFORE_INIT, APP_BEFORE_READY, APP_CONFIGURED, APP_ERROR, APP_I18N_CONFIGURED,
    APP_LOGGING_CONFIGURED, APP_READY,
};
use std::sync::Arc;

/// A lifecycle notification.
///
/// Each variant maps to exactly one `APP.*` topic; see [`topic`](Self::topic).
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// The before-init stage finished.
    BeforeInit,
    /// Configuration is available.
    Configured,
    /// The API client and authenticated user are available.
    Authenticated,
    /// Internationalization is configured.
    I18nConfigured,
    /// Logging is configured.
    LoggingConfigured,
    /// Analytics is configured.
    AnalyticsConfigured,
    /// The before-ready stage finished.
    BeforeReady,
    /// Initialization succeeded.
    Ready,
    /// Initialization stopped on this error.
    Error(Arc<AppError>),
    /// The authenticated user was enriched with account data.
    AuthenticatedUserChanged,
}

impl LifecycleEvent {
    /// Topic the event is published on.
    #[must_use]
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::BeforeInit => APP_BEFORE_INIT,
            Self::Configured => APP_CONFIGURED,
            Self::Authenticated => APP_AUTHENTICATED,
            Self::I18nConfigured => APP_I18N_CONFIGURED,
            Self::LoggingConfigured => APP_LOGGING_CONFIGURED,
            Self::AnalyticsConfigured => APP_ANALYTICS_CONFIGURED,
            Self::BeforeReady => APP_BEFORE_READY,
            Self::Ready => APP_READY,
            Self::Error(_) => APP_ERROR,
            Self::AuthenticatedUserChanged => APP_AUTHENTICATED_USER_CHANGED,
        }
    }

    /// Completion event for `stage`. The error stage has none: its event
    /// carries the error and is built by the orchestrator.
    #[must_use]
    pub const fn completed(stage: Stage) -> Option<Self> {
        match stage {
            Stage::BeforeInit => Some(Self::BeforeInit),
            Stage::Configuration => Some(Self::Configured),
            Stage::Authentication => Some(Self::Authenticated),
            Stage::Internationalization => Some(Self::I18nConfigured),
            Stage::Logging => Some(Self::LoggingConfigured),
            Stage::Analytics => Some(Self::AnalyticsConfigured),
            Stage::BeforeReady => Some(Self::BeforeReady),
            Stage::Ready => Some(Self::Ready),
            Stage::Error => None,
        }
    }

    /// The error carried by an [`Error`](Self::Error) event.
    #[must_use]
    pub fn error(&self) -> Option<&AppError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_core::topics::LIFECYCLE_TOPICS;

    #[test]
    fn test_completion_topics_follow_stage_order() {
        let topics: Vec<&str> = Stage::SEQUENCE
            .iter()
            .filter_map(|stage| LifecycleEvent::completed(*stage))
            .map(|event| event.topic())
            .collect();
        assert_eq!(topics, LIFECYCLE_TOPICS);
    }

    #[test]
    fn test_error_event() {
        let event = LifecycleEvent::Error(Arc::new(AppError::stage("test", "boom")));
        assert_eq!(event.topic(), APP_ERROR);
        assert_eq!(event.error(), Some(&AppError::stage("test", "boom")));
        assert_eq!(LifecycleEvent::completed(Stage::Error), None);
    }
}
