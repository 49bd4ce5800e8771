//! Request error types and the known-error classifier.
//!
//! A failed request is a *known error* when the server answered with a body
//! carrying `errors`, `field_errors`, or `messages`. Known errors are reshaped
//! into [`KnownError`] with camel-cased contents; anything else is passed
//! through untouched as [`RequestError::Unknown`].

use crate::client::ClientResponse;
use launchpad_core::case::camel_case_object;
use serde_json::Value;
use thiserror::Error;

/// Result type alias for request wrapper operations.
pub type Result<T> = std::result::Result<T, RequestError>;

/// Keys that mark a response body as a structured error.
pub const KNOWN_ERROR_KEYS: [&str; 3] = ["errors", "field_errors", "messages"];

/// Error reported by an [`HttpClient`](crate::HttpClient).
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct ClientError {
    /// Human-readable description.
    pub message: String,

    /// Response that caused the failure, if the server answered.
    pub response: Option<ClientResponse>,
}

impl ClientError {
    /// Failure without a response (connection refused, invalid URL, ...).
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: None,
        }
    }

    /// Failure caused by a non-success response.
    #[must_use]
    pub fn status(status: u16, data: Value) -> Self {
        Self {
            message: format!("Request failed with status code {status}"),
            response: Some(ClientResponse::new(status, data)),
        }
    }

    /// Status code of the response, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.response.as_ref().map(|response| response.status)
    }
}

/// Structured error reshaped from a server response.
///
/// Each field is the camel-cased value of the matching response key, or
/// `None` when the response did not carry it.
#[derive(Debug, Error, Clone, Default, PartialEq)]
#[error("Request failed with structured errors")]
pub struct KnownError {
    /// Per-field validation errors (`field_errors` in the response).
    pub field_errors: Option<Value>,

    /// General errors.
    pub errors: Option<Value>,

    /// Informational messages.
    pub messages: Option<Value>,
}

/// Error returned by the request wrapper.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RequestError {
    /// The response matched the known-error shape.
    #[error(transparent)]
    Known(KnownError),

    /// Any other failure, exactly as the client reported it.
    #[error(transparent)]
    Unknown(ClientError),
}

impl RequestError {
    /// Structured error, if this is a known error.
    #[must_use]
    pub const fn as_known(&self) -> Option<&KnownError> {
        match self {
            Self::Known(known) => Some(known),
            Self::Unknown(_) => None,
        }
    }
}

impl From<ClientError> for RequestError {
    fn from(error: ClientError) -> Self {
        if is_known_error(&error) {
            Self::Known(format_known_error(&error))
        } else {
            Self::Unknown(error)
        }
    }
}

/// Whether `error` carries a response body with any of [`KNOWN_ERROR_KEYS`].
#[must_use]
pub fn is_known_error(error: &ClientError) -> bool {
    error
        .response
        .as_ref()
        .and_then(|response| response.data.as_object())
        .is_some_and(|data| KNOWN_ERROR_KEYS.iter().any(|key| data.contains_key(*key)))
}

/// Build a [`KnownError`] from the camel-cased response body of `error`.
///
/// Missing keys (or a missing body) leave the matching field as `None`.
#[must_use]
pub fn format_known_error(error: &ClientError) -> KnownError {
    let data = error
        .response
        .as_ref()
        .map_or(Value::Null, |response| camel_case_object(response.data.clone()));

    let take = |key: &str| data.get(key).cloned();
    KnownError {
        field_errors: take("fieldErrors"),
        errors: take("errors"),
        messages: take("messages"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transport_error_is_unknown() {
        let error = ClientError::transport("connection refused");
        assert!(!is_known_error(&error));
        assert_eq!(RequestError::from(error.clone()), RequestError::Unknown(error));
    }

    #[test]
    fn test_body_without_known_keys_is_unknown() {
        let error = ClientError::status(500, json!({ "detail": "boom" }));
        assert!(!is_known_error(&error));
    }

    #[test]
    fn test_non_object_body_is_unknown() {
        let error = ClientError::status(502, json!("Bad Gateway"));
        assert!(!is_known_error(&error));
    }

    #[test]
    fn test_each_known_key_is_recognized() {
        for key in KNOWN_ERROR_KEYS {
            let mut body = serde_json::Map::new();
            body.insert(key.to_string(), json!([]));
            let error = ClientError::status(400, Value::Object(body));
            assert!(is_known_error(&error), "{key} should be known");
        }
    }

    #[test]
    fn test_format_known_error_camel_cases() {
        let error = ClientError::status(
            400,
            json!({
                "field_errors": [{ "field_name": "username", "user_message": "taken" }],
                "messages": ["check the form"],
            }),
        );

        let known = format_known_error(&error);
        assert_eq!(
            known.field_errors,
            Some(json!([{ "fieldName": "username", "userMessage": "taken" }]))
        );
        assert_eq!(known.errors, None);
        assert_eq!(known.messages, Some(json!(["check the form"])));
    }

    #[test]
    fn test_status_code() {
        assert_eq!(ClientError::status(404, Value::Null).status_code(), Some(404));
        assert_eq!(ClientError::transport("x").status_code(), None);
    }
}
