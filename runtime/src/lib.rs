//! # Launchpad Runtime
//!
//! Application bootstrap: a fixed sequence of lifecycle stages that load
//! configuration, authenticate the visitor, and set up i18n, logging, and
//! analytics before the application is declared ready.
//!
//! ## Core Components
//!
//! - **App**: the context every stage reads and writes
//! - **Lifecycle**: the orchestrator running stages in order, with per-stage overrides
//! - **Handlers**: the default implementation of each stage
//! - **Services**: traits for the external auth, i18n, logging, and analytics services
//! - **Events**: typed `APP.*` notifications published on the bus
//!
//! ## Example
//!
//! ```ignore
//! use launchpad_runtime::{App, InitializeOptions, LifecycleEvent, Services};
//! use launchpad_core::topics::APP_READY;
//!
//! let mut app = App::new();
//! app.subscribe(APP_READY, |_, _| render());
//!
//! app.initialize(
//!     InitializeOptions::new()
//!         .with_messages(catalogs)
//!         .with_services(Services::new().with_auth(auth).with_analytics(analytics)),
//! )
//! .await;
//! ```

pub mod app;
pub mod error;
pub mod events;
pub mod handlers;
pub mod lifecycle;
pub mod services;

pub use app::{App, DEFAULT_LOCATION, LifecycleBus};
pub use error::{AppError, Result};
pub use events::LifecycleEvent;
pub use lifecycle::{InitializeOptions, Overrides, Stage, StageFn, StageFuture, StageHandler};
pub use services::{
    AnalyticsService, AnalyticsSettings, AuthService, AuthSession, AuthSettings, I18nService,
    LoggingService, Messages, Services, TracingLoggingService,
};
