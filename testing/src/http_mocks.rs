//! Scripted HTTP client.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use launchpad_api::{ClientError, ClientFuture, ClientRequest, ClientResponse, HttpClient, Method};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

/// A request seen by [`MockHttpClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Verb the request was issued with.
    pub method: Method,
    /// The request as handed to the client.
    pub request: ClientRequest,
}

/// In-memory [`HttpClient`] with scripted replies.
///
/// Queued replies are used first, in order; after that every request gets
/// the default reply (`200` with a `null` body unless changed). Clones share
/// the script and the request log.
///
/// # Example
///
/// ```
/// use launchpad_api::{Api, ClientError};
/// use launchpad_testing::MockHttpClient;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let client = MockHttpClient::responding(200, json!({ "user_name": "someone" }));
/// let api = Api::new(Arc::new(client.clone()));
///
/// let body = api.get("/api/user").await;
/// assert_eq!(body, Ok(json!({ "userName": "someone" })));
/// assert_eq!(client.request_count(), 1);
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct MockHttpClient {
    default_reply: Arc<RwLock<Result<ClientResponse, ClientError>>>,
    queued: Arc<RwLock<VecDeque<Result<ClientResponse, ClientError>>>>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Client answering every request with `200` and a `null` body.
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_reply: Arc::new(RwLock::new(Ok(ClientResponse::new(200, Value::Null)))),
            queued: Arc::new(RwLock::new(VecDeque::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Client answering every request with `status` and `data`.
    #[must_use]
    pub fn responding(status: u16, data: Value) -> Self {
        let client = Self::new();
        client.set_default_reply(Ok(ClientResponse::new(status, data)));
        client
    }

    /// Client rejecting every request with `error`.
    #[must_use]
    pub fn failing(error: ClientError) -> Self {
        let client = Self::new();
        client.set_default_reply(Err(error));
        client
    }

    /// Replace the default reply.
    pub fn set_default_reply(&self, reply: Result<ClientResponse, ClientError>) {
        *self.default_reply.write().unwrap() = reply;
    }

    /// Queue a reply for the next unanswered request.
    pub fn push_reply(&self, reply: Result<ClientResponse, ClientError>) {
        self.queued.write().unwrap().push_back(reply);
    }

    /// Every request seen so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().unwrap().clone()
    }

    /// The most recent request.
    #[must_use]
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.read().unwrap().last().cloned()
    }

    /// Number of requests seen so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.read().unwrap().len()
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for MockHttpClient {
    fn send(&self, method: Method, request: ClientRequest) -> ClientFuture<'_> {
        self.requests
            .write()
            .unwrap()
            .push(RecordedRequest { method, request });

        let queued = self.queued.write().unwrap().pop_front();
        let reply = queued.unwrap_or_else(|| self.default_reply.read().unwrap().clone());
        Box::pin(async move { reply })
    }
}
