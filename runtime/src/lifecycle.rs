//! Lifecycle orchestrator.
//!
//! Initialization runs eight stages in a fixed order, each followed by its
//! completion event:
//!
//! ```text
//! before_init → configuration → authentication → internationalization
//!             → logging → analytics → before_ready → ready
//!        │            │               │                 │
//!        └────────────┴──── any failure ────────────────┘
//!                               │
//!                               ▼
//!                        error stage → APP.ERROR
//! ```
//!
//! Every stage runs either its default handler (see [`crate::handlers`]) or
//! the caller's override, never both. Stages run strictly one after another:
//! later stages read state written by earlier ones. The first failure stops
//! the sequence, is stored in [`App::error`], runs the error stage, and is
//! published as the single [`LifecycleEvent::Error`]. Exactly one of
//! `APP.READY` and `APP.ERROR` is published per run.

use crate::app::App;
use crate::error::{AppError, Result};
use crate::events::LifecycleEvent;
use crate::handlers;
use crate::services::{Messages, Services};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::Instrument;

/// Future returned by stage handlers.
pub type StageFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Signature of the default stage handlers.
pub type StageFn = for<'a> fn(&'a mut App) -> StageFuture<'a>;

/// A named step of application startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// First stage; runs before initialization options are applied.
    BeforeInit,
    /// Loads configuration.
    Configuration,
    /// Builds the API client and resolves the signed-in user.
    Authentication,
    /// Installs message catalogs.
    Internationalization,
    /// Prepares the logging service.
    Logging,
    /// Sets up analytics.
    Analytics,
    /// Last chance to prepare before the application is ready.
    BeforeReady,
    /// Marks the application ready.
    Ready,
    /// Runs when any other stage fails.
    Error,
}

impl Stage {
    /// Stages in execution order; [`Stage::Error`] is not part of the sequence.
    pub const SEQUENCE: [Self; 8] = [
        Self::BeforeInit,
        Self::Configuration,
        Self::Authentication,
        Self::Internationalization,
        Self::Logging,
        Self::Analytics,
        Self::BeforeReady,
        Self::Ready,
    ];

    /// Snake-case stage name, used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BeforeInit => "before_init",
            Self::Configuration => "configuration",
            Self::Authentication => "authentication",
            Self::Internationalization => "internationalization",
            Self::Logging => "logging",
            Self::Analytics => "analytics",
            Self::BeforeReady => "before_ready",
            Self::Ready => "ready",
            Self::Error => "error",
        }
    }

    /// Handler run when no override is given.
    #[must_use]
    pub fn default_handler(self) -> StageFn {
        match self {
            Self::BeforeInit => handlers::before_init,
            Self::Configuration => handlers::configuration,
            Self::Authentication => handlers::authentication,
            Self::Internationalization => handlers::internationalization,
            Self::Logging => handlers::logging,
            Self::Analytics => handlers::analytics,
            Self::BeforeReady => handlers::before_ready,
            Self::Ready => handlers::ready,
            Self::Error => handlers::error,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A stage handler.
///
/// Implemented for every `fn(&mut App) -> StageFuture<'_>`, so plain
/// functions can be used as overrides:
///
/// ```
/// use launchpad_runtime::{App, Overrides, Stage, StageFuture};
///
/// fn quiet_ready(_app: &mut App) -> StageFuture<'_> {
///     Box::pin(async { Ok(()) })
/// }
///
/// let overrides = Overrides::new().with(Stage::Ready, quiet_ready);
/// assert!(overrides.contains(Stage::Ready));
/// ```
pub trait StageHandler: Send + Sync {
    /// Run the stage against `app`.
    fn handle<'a>(&'a self, app: &'a mut App) -> StageFuture<'a>;
}

impl<F> StageHandler for F
where
    F: for<'a> Fn(&'a mut App) -> StageFuture<'a> + Send + Sync,
{
    fn handle<'a>(&'a self, app: &'a mut App) -> StageFuture<'a> {
        self(app)
    }
}

/// Per-stage replacements for the default handlers.
#[derive(Clone, Default)]
pub struct Overrides {
    handlers: HashMap<Stage, Arc<dyn StageHandler>>,
}

impl Overrides {
    /// No overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the handler for `stage`.
    #[must_use]
    pub fn with<H>(self, stage: Stage, handler: H) -> Self
    where
        H: StageHandler + 'static,
    {
        self.with_shared(stage, Arc::new(handler))
    }

    /// Replace the handler for `stage` with a shared handler.
    #[must_use]
    pub fn with_shared(mut self, stage: Stage, handler: Arc<dyn StageHandler>) -> Self {
        self.handlers.insert(stage, handler);
        self
    }

    /// Override registered for `stage`.
    #[must_use]
    pub fn get(&self, stage: Stage) -> Option<&Arc<dyn StageHandler>> {
        self.handlers.get(&stage)
    }

    /// Whether `stage` is overridden.
    #[must_use]
    pub fn contains(&self, stage: Stage) -> bool {
        self.handlers.contains_key(&stage)
    }
}

impl std::fmt::Debug for Overrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut stages: Vec<Stage> = self.handlers.keys().copied().collect();
        stages.sort();
        f.debug_struct("Overrides").field("stages", &stages).finish()
    }
}

/// Options for [`App::initialize`].
///
/// Everything except `overrides` is applied to the [`App`] after the
/// before-init stage completes.
#[derive(Debug, Clone, Default)]
pub struct InitializeOptions {
    /// Message catalogs for the internationalization stage.
    pub messages: Messages,

    /// Services used by the default handlers.
    pub services: Services,

    /// Stage overrides.
    pub overrides: Overrides,

    /// Application-specific fields, stored on [`App::custom`].
    pub custom: Map<String, Value>,

    /// See [`App::hydrate_authenticated_user`].
    pub hydrate_authenticated_user: bool,

    /// See [`App::allow_anonymous`].
    pub allow_anonymous: bool,

    /// Page location, when the host knows it.
    pub location: Option<String>,
}

impl InitializeOptions {
    /// Default options: no services, no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message catalogs.
    #[must_use]
    pub fn with_messages(mut self, messages: impl Into<Messages>) -> Self {
        self.messages = messages.into();
        self
    }

    /// Set the services.
    #[must_use]
    pub fn with_services(mut self, services: Services) -> Self {
        self.services = services;
        self
    }

    /// Set the stage overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Add a custom field.
    #[must_use]
    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }

    /// Fetch account details after authentication.
    #[must_use]
    pub const fn hydrate_authenticated_user(mut self, hydrate: bool) -> Self {
        self.hydrate_authenticated_user = hydrate;
        self
    }

    /// Let anonymous visitors through.
    #[must_use]
    pub const fn allow_anonymous(mut self, allow: bool) -> Self {
        self.allow_anonymous = allow;
        self
    }

    /// Set the page location.
    #[must_use]
    pub fn with_location(mut self, url: impl Into<String>) -> Self {
        self.location = Some(url.into());
        self
    }
}

impl App {
    /// Run the lifecycle.
    ///
    /// There is no return value: progress and the outcome are observable on
    /// the bus (`APP.*` topics) and through [`App::error`].
    #[tracing::instrument(skip_all, name = "app_initialize")]
    pub async fn initialize(&mut self, options: InitializeOptions) {
        let InitializeOptions {
            messages,
            services,
            overrides,
            custom,
            hydrate_authenticated_user,
            allow_anonymous,
            location,
        } = options;

        let mut pending = Some(move |app: &mut Self| -> Result<()> {
            app.messages = messages;
            app.services = services;
            app.custom = custom;
            app.hydrate_authenticated_user = hydrate_authenticated_user;
            app.allow_anonymous = allow_anonymous;
            match location {
                Some(url) => app.set_location(&url),
                None => Ok(()),
            }
        });

        for stage in Stage::SEQUENCE {
            if let Err(error) = self.run_stage(stage, &overrides).await {
                tracing::error!(%stage, %error, "Initialization failed");
                self.fail(error, &overrides).await;
                return;
            }
            if let Some(event) = LifecycleEvent::completed(stage) {
                self.publish(&event);
            }
            if let Some(apply) = pending.take() {
                if let Err(error) = apply(self) {
                    tracing::error!(%error, "Invalid initialization options");
                    self.fail(error, &overrides).await;
                    return;
                }
            }
        }
        tracing::info!("Application ready");
    }

    async fn run_stage(&mut self, stage: Stage, overrides: &Overrides) -> Result<()> {
        let span = tracing::debug_span!("stage", stage = stage.name());
        async move {
            match overrides.get(stage) {
                Some(handler) => {
                    tracing::debug!("Running override");
                    handler.handle(self).await
                }
                None => {
                    tracing::debug!("Running default handler");
                    (stage.default_handler())(self).await
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn fail(&mut self, error: AppError, overrides: &Overrides) {
        let error = Arc::new(error);
        self.error = Some(Arc::clone(&error));

        if let Err(handler_error) = self.run_stage(Stage::Error, overrides).await {
            tracing::error!(error = %handler_error, "Error stage failed");
        }
        self.publish(&LifecycleEvent::Error(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_excludes_error() {
        assert_eq!(Stage::SEQUENCE.len(), 8);
        assert!(!Stage::SEQUENCE.contains(&Stage::Error));
        assert!(Stage::SEQUENCE.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Internationalization.to_string(), "internationalization");
        assert_eq!(Stage::BeforeReady.name(), "before_ready");
    }

    fn failing(_app: &mut App) -> StageFuture<'_> {
        Box::pin(async { Err(AppError::stage("override", "boom")) })
    }

    #[test]
    fn test_overrides_registry() {
        let overrides = Overrides::new().with(Stage::Authentication, failing);
        assert!(overrides.contains(Stage::Authentication));
        assert!(!overrides.contains(Stage::Ready));
        assert!(overrides.get(Stage::Authentication).is_some());
        assert_eq!(
            format!("{overrides:?}"),
            "Overrides { stages: [Authentication] }"
        );
    }

    #[test]
    fn test_options_builder() {
        let options = InitializeOptions::new()
            .with_custom("appName", "demo")
            .hydrate_authenticated_user(true)
            .allow_anonymous(true);
        assert_eq!(options.custom.get("appName"), Some(&Value::from("demo")));
        assert!(options.hydrate_authenticated_user);
        assert!(options.allow_anonymous);
    }
}
