//! Injected HTTP client abstraction.
//!
//! The request wrapper never talks to the network itself; it forwards every
//! call to an [`HttpClient`] supplied by the application (usually the
//! authenticated client built during the authentication stage).

use crate::error::ClientError;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

pub use reqwest::{Method, Url};

/// Future returned by [`HttpClient`] methods.
pub type ClientFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ClientResponse, ClientError>> + Send + 'a>>;

/// A request handed to the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientRequest {
    /// Absolute URL, or a path resolved against the client's base URL.
    pub url: String,

    /// Query string pairs, appended in order.
    pub query: Vec<(String, String)>,

    /// Extra request headers.
    pub headers: Vec<(String, String)>,

    /// JSON body, if any.
    pub body: Option<Value>,
}

impl ClientRequest {
    /// Create a request for `url` with no query, headers, or body.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Append a query pair.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl From<&str> for ClientRequest {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for ClientRequest {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}

/// A response produced by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientResponse {
    /// HTTP status code.
    pub status: u16,

    /// Decoded body; `null` when the body was empty.
    pub data: Value,
}

impl ClientResponse {
    /// Create a response.
    #[must_use]
    pub const fn new(status: u16, data: Value) -> Self {
        Self { status, data }
    }
}

/// HTTP client the request wrapper forwards to.
///
/// Implementors provide [`send`](Self::send); the per-verb methods are
/// provided and may be overridden individually.
///
/// # Dyn Compatibility
///
/// Methods return [`ClientFuture`] instead of using `async fn` so the client
/// can be stored as `Arc<dyn HttpClient>` on the application context.
pub trait HttpClient: Send + Sync {
    /// Issue `request` with `method`.
    ///
    /// Implementations resolve with the decoded response for 2xx statuses and
    /// reject with a [`ClientError`] otherwise. Rejections caused by an HTTP
    /// response should carry it in [`ClientError::response`].
    fn send(&self, method: Method, request: ClientRequest) -> ClientFuture<'_>;

    /// Issue a `GET`.
    fn get(&self, request: ClientRequest) -> ClientFuture<'_> {
        self.send(Method::GET, request)
    }

    /// Issue a `DELETE`.
    fn delete(&self, request: ClientRequest) -> ClientFuture<'_> {
        self.send(Method::DELETE, request)
    }

    /// Issue a `HEAD`.
    fn head(&self, request: ClientRequest) -> ClientFuture<'_> {
        self.send(Method::HEAD, request)
    }

    /// Issue an `OPTIONS`.
    fn options(&self, request: ClientRequest) -> ClientFuture<'_> {
        self.send(Method::OPTIONS, request)
    }

    /// Issue a `PATCH`.
    fn patch(&self, request: ClientRequest) -> ClientFuture<'_> {
        self.send(Method::PATCH, request)
    }

    /// Issue a `POST`.
    fn post(&self, request: ClientRequest) -> ClientFuture<'_> {
        self.send(Method::POST, request)
    }

    /// Issue a `PUT`.
    fn put(&self, request: ClientRequest) -> ClientFuture<'_> {
        self.send(Method::PUT, request)
    }
}
