//! `ReqwestClient` against a local mock server.

use launchpad_api::{
    Api, ClientError, ClientRequest, ClientResponse, HttpClient, RequestError, ReqwestClient,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestClient {
    ReqwestClient::new()
        .with_base_url(&server.uri())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_get_decodes_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/v1/accounts/someone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user_name": "someone" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .get(ClientRequest::new("/api/user/v1/accounts/someone"))
        .await;

    assert_eq!(
        response,
        Ok(ClientResponse::new(200, json!({ "user_name": "someone" })))
    );
}

#[tokio::test]
async fn test_post_sends_query_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register"))
        .and(query_param("next", "/dashboard"))
        .and(header("X-CSRFToken", "token"))
        .and(body_json(json!({ "username": "someone" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = ClientRequest::new("/api/register")
        .with_query("next", "/dashboard")
        .with_header("X-CSRFToken", "token")
        .with_json(json!({ "username": "someone" }));

    let response = client.post(request).await;
    assert_eq!(response, Ok(ClientResponse::new(201, serde_json::Value::Null)));
}

#[tokio::test]
async fn test_error_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/profile"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "field_errors": { "name": "required" } })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client.put(ClientRequest::new("/api/profile")).await.err();

    assert_eq!(
        error,
        Some(ClientError::status(400, json!({ "field_errors": { "name": "required" } })))
    );
}

#[tokio::test]
async fn test_plain_text_error_is_unknown_through_wrapper() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let api = Api::new(Arc::new(client_for(&server)));
    let error = api.delete("/api/thing/1").await;

    assert_eq!(
        error,
        Err(RequestError::Unknown(ClientError::status(502, json!("Bad Gateway"))))
    );
}

#[tokio::test]
async fn test_known_error_through_wrapper() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "field_errors": [{ "field_name": "email", "user_message": "Invalid" }]
        })))
        .mount(&server)
        .await;

    let api = Api::new(Arc::new(client_for(&server)));
    let error = api.patch("/api/user/v1/accounts/someone").await.err();

    assert_eq!(
        error.as_ref().and_then(RequestError::as_known).and_then(|k| k.field_errors.clone()),
        Some(json!([{ "fieldName": "email", "userMessage": "Invalid" }]))
    );
}

#[tokio::test]
async fn test_connection_failure_has_no_response() {
    let client = ReqwestClient::new();
    let error = client
        .get(ClientRequest::new("http://127.0.0.1:1/unreachable"))
        .await
        .err();

    assert!(error.is_some_and(|e| e.response.is_none()));
}
