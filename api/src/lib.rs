//! # Launchpad API
//!
//! A thin request wrapper that normalizes responses for the application:
//!
//! - Success bodies are returned with camel-cased keys
//! - Failures whose body carries `errors`, `field_errors`, or `messages` are
//!   reshaped into a [`KnownError`]
//! - Every other failure is passed through unmodified
//!
//! The actual HTTP work is done by an injected [`HttpClient`]; [`ReqwestClient`]
//! is the stock implementation.
//!
//! ## Example
//!
//! ```ignore
//! use launchpad_api::{Api, ReqwestClient, RequestError};
//! use std::sync::Arc;
//!
//! let client = ReqwestClient::new().with_base_url("https://lms.example.com")?;
//! let api = Api::new(Arc::new(client));
//!
//! match api.post(ClientRequest::new("/api/register").with_json(form)).await {
//!     Ok(body) => println!("{body}"),
//!     Err(RequestError::Known(known)) => show_field_errors(known.field_errors),
//!     Err(other) => return Err(other.into()),
//! }
//! ```

pub mod client;
pub mod error;
pub mod request;
pub mod reqwest_client;

pub use client::{ClientFuture, ClientRequest, ClientResponse, HttpClient, Method, Url};
pub use error::{
    ClientError, KnownError, RequestError, Result, format_known_error, is_known_error,
};
pub use request::Api;
pub use reqwest_client::ReqwestClient;
