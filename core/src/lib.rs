//! # Launchpad Core
//!
//! Shared building blocks for bootstrapping a client application.
//!
//! This crate provides:
//! - [`case`]: recursive key-case transforms over JSON values
//! - [`bus`]: a synchronous publish/subscribe bus with hierarchical topics
//! - [`topics`]: the `APP.*` lifecycle topic constants
//! - [`config`]: the environment-derived configuration document
//! - [`user`]: the authenticated user record
//!
//! The lifecycle orchestrator that ties these together lives in
//! `launchpad-runtime`; the HTTP request wrapper lives in `launchpad-api`.

pub mod bus;
pub mod case;
pub mod config;
pub mod error;
pub mod topics;
pub mod user;

pub use bus::{PubSub, SubscriptionToken};
pub use case::{camel_case_object, convert_key_names, modify_object_keys, snake_case_object};
pub use config::AppConfig;
pub use error::{CoreError, Result};
pub use user::AuthenticatedUser;
