//! Request wrapper over an injected [`HttpClient`].

use crate::client::{ClientFuture, ClientRequest, HttpClient};
use crate::error::{RequestError, Result};
use launchpad_core::case::camel_case_object;
use serde_json::Value;
use std::sync::Arc;

/// Request wrapper.
///
/// Every verb forwards to the client method of the same name. Successful
/// response bodies come back with camel-cased keys; failures are classified
/// into [`RequestError::Known`] or passed through as
/// [`RequestError::Unknown`]. There are no retries or timeouts here: those
/// belong to the injected client.
///
/// # Example
///
/// ```ignore
/// let api = Api::new(app.api_client()?);
/// let account = api.get("/api/user/v1/accounts/me").await?;
/// ```
#[derive(Clone)]
pub struct Api {
    client: Arc<dyn HttpClient>,
}

impl Api {
    /// Wrap `client`.
    #[must_use]
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    /// The wrapped client.
    #[must_use]
    pub fn client(&self) -> &Arc<dyn HttpClient> {
        &self.client
    }

    /// `GET` through [`HttpClient::get`].
    pub async fn get(&self, request: impl Into<ClientRequest>) -> Result<Value> {
        settle("get", self.client.get(request.into())).await
    }

    /// `DELETE` through [`HttpClient::delete`].
    pub async fn delete(&self, request: impl Into<ClientRequest>) -> Result<Value> {
        settle("delete", self.client.delete(request.into())).await
    }

    /// `HEAD` through [`HttpClient::head`].
    pub async fn head(&self, request: impl Into<ClientRequest>) -> Result<Value> {
        settle("head", self.client.head(request.into())).await
    }

    /// `OPTIONS` through [`HttpClient::options`].
    pub async fn options(&self, request: impl Into<ClientRequest>) -> Result<Value> {
        settle("options", self.client.options(request.into())).await
    }

    /// `PATCH` through [`HttpClient::patch`].
    pub async fn patch(&self, request: impl Into<ClientRequest>) -> Result<Value> {
        settle("patch", self.client.patch(request.into())).await
    }

    /// `POST` through [`HttpClient::post`].
    pub async fn post(&self, request: impl Into<ClientRequest>) -> Result<Value> {
        settle("post", self.client.post(request.into())).await
    }

    /// `PUT` through [`HttpClient::put`].
    pub async fn put(&self, request: impl Into<ClientRequest>) -> Result<Value> {
        settle("put", self.client.put(request.into())).await
    }
}

impl std::fmt::Debug for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Api").finish_non_exhaustive()
    }
}

async fn settle(verb: &'static str, pending: ClientFuture<'_>) -> Result<Value> {
    match pending.await {
        Ok(response) => {
            tracing::trace!(verb, status = response.status, "Request succeeded");
            Ok(camel_case_object(response.data))
        }
        Err(error) => {
            let error = RequestError::from(error);
            match &error {
                RequestError::Known(_) => tracing::debug!(verb, "Request failed with known error"),
                RequestError::Unknown(cause) => {
                    tracing::debug!(verb, error = %cause, "Request failed");
                }
            }
            Err(error)
        }
    }
}
