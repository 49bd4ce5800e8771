//! Default stage handlers.
//!
//! Each function here is what [`App::initialize`] runs for a stage that was
//! not overridden. They are public so overrides can wrap them:
//!
//! ```
//! use launchpad_runtime::{handlers, App, StageFuture};
//!
//! fn strict_configuration(app: &mut App) -> StageFuture<'_> {
//!     Box::pin(async move {
//!         handlers::configuration(app).await?;
//!         handlers::validation(app).await
//!     })
//! }
//! # let _ = strict_configuration;
//! ```

use crate::app::App;
use crate::error::Result;
use crate::events::LifecycleEvent;
use crate::lifecycle::StageFuture;
use crate::services::{AnalyticsSettings, AuthSettings};
use crate::services::auth::AUTH_REQUESTER;
use launchpad_core::AppConfig;
use launchpad_core::config::LMS_BASE_URL;
use serde_json::json;

/// Path of the account endpoint, relative to `LMS_BASE_URL`.
pub const ACCOUNT_API_PATH: &str = "/api/user/v1/accounts";

/// Does nothing.
pub fn before_init(_app: &mut App) -> StageFuture<'_> {
    Box::pin(async {
        tracing::debug!("Before init");
        Ok(())
    })
}

/// Load configuration from the process environment.
///
/// A configuration set on the [`App`] before initialization is kept.
pub fn configuration(app: &mut App) -> StageFuture<'_> {
    Box::pin(async move {
        if app.config().is_ok() {
            tracing::debug!("Keeping preset configuration");
            return Ok(());
        }
        let config = AppConfig::from_env();
        tracing::debug!(keys = config.len(), "Configuration loaded");
        app.set_config(config)
    })
}

/// Build the API client and resolve the signed-in user.
///
/// Anonymous visitors are sent to login unless
/// [`App::allow_anonymous`] is set. With
/// [`App::hydrate_authenticated_user`], account details are fetched and
/// merged into the user afterwards. A failed fetch is reported to the
/// logging service and leaves the user as it was; it does not fail the stage.
pub fn authentication(app: &mut App) -> StageFuture<'_> {
    Box::pin(async move {
        let settings = AuthSettings::from_config(app.config()?)?;
        let auth = app.services.auth()?;
        let logging = app.services.logging();
        app.set_api_client(auth.api_client(&settings, logging)?)?;

        let session = auth.authenticated_session(app.location().path()).await?;
        app.authenticated_user = session.user;
        app.decoded_access_token = session.decoded_access_token;

        match app.authenticated_user.as_ref() {
            Some(user) => tracing::debug!(user_id = %user.user_id, "Authenticated"),
            None if app.allow_anonymous => tracing::debug!("Anonymous visitor"),
            None => {
                let redirect_url = app.location().to_string();
                tracing::debug!(%redirect_url, "Redirecting to login");
                auth.login(&redirect_url).await?;
            }
        }

        if app.hydrate_authenticated_user {
            if let Err(error) = hydrate_authenticated_user(app).await {
                tracing::warn!(%error, "Account hydration failed");
                app.services.logging().log_error(
                    &error.to_string(),
                    &json!({ "source": "hydrate_authenticated_user" }),
                );
            }
        }
        Ok(())
    })
}

/// Fetch account details for the signed-in user and merge them in.
///
/// Publishes [`LifecycleEvent::AuthenticatedUserChanged`] once merged. Does
/// nothing for anonymous visitors.
///
/// # Errors
///
/// Fails before authentication, without `LMS_BASE_URL`, or when the
/// account request fails.
pub async fn hydrate_authenticated_user(app: &mut App) -> Result<()> {
    let Some(username) = app.authenticated_user.as_ref().map(|u| u.username.clone()) else {
        return Ok(());
    };
    let base_url = app
        .config()?
        .require_str(LMS_BASE_URL, AUTH_REQUESTER)?
        .trim_end_matches('/')
        .to_string();
    let api = app.api()?;

    let account = api
        .get(format!("{base_url}{ACCOUNT_API_PATH}/{username}"))
        .await?;

    if let Some(user) = app.authenticated_user.as_mut() {
        user.merge_account(&account);
    }
    app.publish(&LifecycleEvent::AuthenticatedUserChanged);
    Ok(())
}

/// Hand the merged message catalog to the i18n service.
pub fn internationalization(app: &mut App) -> StageFuture<'_> {
    Box::pin(async move {
        let i18n = app.services.i18n()?;
        let messages = app.messages.merged();
        i18n.configure(app.config()?, &messages)
    })
}

/// Prepare the logging service.
pub fn logging(app: &mut App) -> StageFuture<'_> {
    Box::pin(async move { app.services.logging().configure() })
}

/// Configure analytics from `SEGMENT_KEY` and `LMS_BASE_URL`.
pub fn analytics(app: &mut App) -> StageFuture<'_> {
    Box::pin(async move {
        let settings = AnalyticsSettings::from_config(app.config()?)?;
        app.services.analytics()?.configure(&settings)
    })
}

/// Does nothing.
pub fn before_ready(_app: &mut App) -> StageFuture<'_> {
    Box::pin(async {
        tracing::debug!("Before ready");
        Ok(())
    })
}

/// Identify the visitor with analytics and record the page view.
pub fn ready(app: &mut App) -> StageFuture<'_> {
    Box::pin(async move {
        let analytics = app.services.analytics()?;
        match app.authenticated_user.as_ref() {
            Some(user) => analytics.identify_authenticated_user(&user.user_id).await?,
            None => analytics.identify_anonymous_user().await?,
        }
        analytics.send_page_event().await
    })
}

/// Report [`App::error`] through the logging service.
pub fn error(app: &mut App) -> StageFuture<'_> {
    Box::pin(async move {
        if let Some(error) = app.error.as_ref() {
            app.services
                .logging()
                .log_error(&error.to_string(), &json!({ "source": "initialize" }));
        }
        Ok(())
    })
}

/// Fail if any configuration value is unset.
pub fn validation(app: &mut App) -> StageFuture<'_> {
    Box::pin(async move {
        app.config()?.validate()?;
        Ok(())
    })
}
