//! [`HttpClient`] implementation backed by `reqwest`.

use crate::client::{ClientFuture, ClientRequest, ClientResponse, HttpClient, Method};
use crate::error::ClientError;
use reqwest::{Client, Url};
use serde_json::Value;

/// `reqwest`-backed HTTP client.
///
/// Relative request URLs are resolved against the optional base URL.
/// Non-2xx responses become [`ClientError`]s carrying the status and the
/// decoded body, which is what the known-error classifier inspects.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
    base_url: Option<Url>,
}

impl ReqwestClient {
    /// Create a client without a base URL.
    #[must_use]
    pub fn new() -> Self {
        Self::from_client(Client::new())
    }

    /// Wrap an already configured `reqwest` client.
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self {
            client,
            base_url: None,
        }
    }

    /// Resolve relative request URLs against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns a transport [`ClientError`] if `base_url` does not parse.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ClientError::transport(format!("Invalid base URL {base_url}: {e}")))?;
        self.base_url = Some(parsed);
        Ok(self)
    }

    /// The base URL, if set.
    #[must_use]
    pub const fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    fn resolve(&self, url: &str) -> Result<Url, ClientError> {
        let resolved = match &self.base_url {
            Some(base) => base.join(url),
            None => Url::parse(url),
        };
        resolved.map_err(|e| ClientError::transport(format!("Invalid URL {url}: {e}")))
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    fn send(&self, method: Method, request: ClientRequest) -> ClientFuture<'_> {
        Box::pin(async move {
            let url = self.resolve(&request.url)?;
            tracing::debug!(%method, %url, "Sending request");

            let mut builder = self.client.request(method, url);
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| ClientError::transport(e.to_string()))?;

            let status = response.status();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| ClientError::transport(e.to_string()))?;
            let data = decode_body(&bytes);

            if status.is_success() {
                Ok(ClientResponse::new(status.as_u16(), data))
            } else {
                Err(ClientError::status(status.as_u16(), data))
            }
        })
    }
}

/// Empty bodies decode to `null`; bodies that are not JSON are kept as text.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b""), Value::Null);
        assert_eq!(decode_body(b"  \n"), Value::Null);
        assert_eq!(decode_body(br#"{"a_b":1}"#), json!({ "a_b": 1 }));
        assert_eq!(decode_body(b"Bad Gateway"), json!("Bad Gateway"));
    }

    #[test]
    fn test_resolve_against_base() {
        let client = ReqwestClient::new()
            .with_base_url("http://localhost:18000/")
            .unwrap_or_default();
        let url = client.resolve("/api/user/v1/accounts/me").map(String::from);
        assert_eq!(url, Ok("http://localhost:18000/api/user/v1/accounts/me".to_string()));
    }

    #[test]
    fn test_relative_url_without_base_fails() {
        let client = ReqwestClient::new();
        assert!(client.resolve("/relative").is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ReqwestClient::new().with_base_url("not a url").is_err());
    }
}
