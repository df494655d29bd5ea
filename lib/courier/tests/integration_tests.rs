//! Integration tests for `HyperClient`, `WebService` and `Resource` using wiremock.

use std::time::Duration;

use assert2::{check, let_assert};
use courier::{
    EMPTY_DATA_REASON, Error, HttpClient, HyperClient, JsonReadingOptions, Method,
    NetworkResponse, Pipeline, Request, StatusValidationInterceptor, WebService, interceptor_fn,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{any, body_json, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

fn alice() -> User {
    User {
        id: 1,
        name: "Alice".to_string(),
    }
}

async fn service() -> (MockServer, WebService<HyperClient>) {
    let mock_server = MockServer::start().await;
    let service = WebService::new(HyperClient::new(), mock_server.uri());
    (mock_server, service)
}

/// An address nothing listens on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

// ============================================================================
// Transport
// ============================================================================

#[tokio::test]
async fn test_transport_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice()))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let url = url::Url::parse(&format!("{}/users/1", mock_server.uri())).expect("url");
    let request = Request::builder(Method::Get, url)
        .header("Accept", "application/json")
        .build();

    let response = client.execute(request).await.expect("response");

    check!(response.is_success());
    check!(response.header("content-type") == Some("application/json"));
    let_assert!(Ok(user) = serde_json::from_slice::<User>(response.body()));
    check!(user == alice());
}

#[tokio::test]
async fn test_transport_http_error_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let url = url::Url::parse(&mock_server.uri()).expect("url");
    let request = Request::builder(Method::Get, url).build();

    let response = client.execute(request).await.expect("response");

    check!(response.status() == 404);
    check!(response.body().as_ref() == b"nope");
}

#[tokio::test]
async fn test_transport_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .timeout(Duration::from_millis(50))
        .build();
    let url = url::Url::parse(&mock_server.uri()).expect("url");

    let_assert!(Err(err) = client.execute(Request::builder(Method::Get, url).build()).await);
    check!(err.is_timeout());
}

#[tokio::test]
async fn test_transport_connection_refused() {
    let client = HyperClient::new();
    let url = url::Url::parse(&closed_port_url()).expect("url");

    let_assert!(Err(err) = client.execute(Request::builder(Method::Get, url).build()).await);
    check!(err.is_connection());
}

// ============================================================================
// Resources
// ============================================================================

#[tokio::test]
async fn test_load_json_object() {
    let (mock_server, service) = service().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = service.server().path("users/1").json().load().await;

    check!(response.status() == Some(200));
    check!(response.error().is_none());
    check!(response.result() == Some(&json!({"id": 1, "name": "Alice"})));
}

#[tokio::test]
async fn test_load_json_typed() {
    let (mock_server, service) = service().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![alice()]))
        .mount(&mock_server)
        .await;

    let users: Vec<User> = service
        .server()
        .path("users")
        .query("page", "2")
        .load_json()
        .await
        .expect("users");

    check!(users == [alice()]);
}

#[tokio::test]
async fn test_load_json_type_mismatch() {
    let (mock_server, service) = service().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "one", "name": "A"})))
        .mount(&mock_server)
        .await;

    let_assert!(
        Err(Error::JsonDeserialization { path, .. }) =
            service.server().load_json::<User>().await
    );
    check!(path == "id");
}

#[tokio::test]
async fn test_post_json_body() {
    let (mock_server, service) = service().await;
    let input = json!({"name": "Bob"});

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&input))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 42, "name": "Bob"})))
        .mount(&mock_server)
        .await;

    let user: User = service
        .server()
        .path("users")
        .post()
        .json_body(&input)
        .load_json()
        .await
        .expect("created");

    check!(user.id == 42);
}

#[tokio::test]
async fn test_empty_body_fails_validation() {
    let (mock_server, service) = service().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let response = service.server().path("users/1").delete().json().load().await;

    check!(response.status() == Some(204));
    let_assert!(Some(err) = response.error());
    check!(err.validation_reason() == Some(EMPTY_DATA_REASON));
    check!(response.result().is_none());
}

#[tokio::test]
async fn test_malformed_json_fails_parsing() {
    let (mock_server, service) = service().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let response = service.server().json().load().await;

    let_assert!(Some(Error::JsonParsing(_)) = response.error());
    check!(response.data().map(|data| data.as_ref()) == Some(&b"<html>oops</html>"[..]));
}

#[tokio::test]
async fn test_strict_json_rejects_fragment() {
    let (mock_server, service) = service().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("42"))
        .mount(&mock_server)
        .await;

    let lenient = service.server().json().load().await;
    check!(lenient.result() == Some(&json!(42)));

    let strict = service
        .server()
        .json_with(JsonReadingOptions::strict())
        .load()
        .await;
    let_assert!(Some(Error::JsonParsing(_)) = strict.error());
}

#[tokio::test]
async fn test_text_resource() {
    let (mock_server, service) = service().await;

    Mock::given(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let response = service.server().path("health").text().load().await;

    check!(response.result() == Some(&json!("ok")));
}

#[tokio::test]
async fn test_no_parser_leaves_result_empty() {
    let (mock_server, service) = service().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let response = service.server().load().await;

    check!(response.error().is_none());
    check!(response.result().is_none());
    let_assert!(Err(err) = response.into_result());
    check!(err.validation_reason() == Some(courier::NO_RESULT_REASON));
}

// ============================================================================
// Predisposition and transport failures
// ============================================================================

#[tokio::test]
async fn test_invalid_server_url_never_reaches_transport() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = WebService::new(HyperClient::new(), "definitely not a url");

    let response = service.server().path("users").json().load().await;

    let_assert!(Some(Error::InvalidBaseUrl(_)) = response.error());
    check!(response.status().is_none());
    check!(response.data().is_none());
}

#[tokio::test]
async fn test_unserializable_body_never_reaches_transport() {
    let (mock_server, service) = service().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut body = std::collections::HashMap::new();
    body.insert(vec![1], "non-string keys");

    let response = service.server().post().json_body(&body).json().load().await;

    let_assert!(Some(Error::JsonSerialization(_)) = response.error());
}

#[tokio::test]
async fn test_custom_resource() {
    let mock_server = MockServer::start().await;

    Mock::given(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pong": true})))
        .mount(&mock_server)
        .await;

    let service = WebService::new(HyperClient::new(), "https://unused.invalid");

    let response = service
        .custom_resource(&mock_server.uri())
        .path("ping")
        .json()
        .load()
        .await;

    check!(response.result() == Some(&json!({"pong": true})));
}

#[tokio::test]
async fn test_transport_failure_reaches_every_stage() {
    #[derive(Clone)]
    struct Seen;

    let audit = interceptor_fn("audit", |mut response: NetworkResponse| {
        response.extensions_mut().insert(Seen);
        response
    });
    let pipeline = Pipeline::standard().with(audit);
    let service = WebService::new(HyperClient::new(), closed_port_url()).with_pipeline(pipeline);

    let response = service.server().json().load().await;

    let_assert!(Some(err) = response.error());
    check!(err.is_connection());
    check!(response.extensions().get::<Seen>().is_some());
}

#[tokio::test]
async fn test_status_validation_stage() {
    let (mock_server, service) = service().await;
    let service =
        service.with_pipeline(Pipeline::standard().with_first(StatusValidationInterceptor::new()));

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&mock_server)
        .await;

    let response = service.server().json().load().await;

    check!(response.status() == Some(500));
    let_assert!(Some(err) = response.error());
    check!(err.validation_reason() == Some("Unacceptable Status Code: 500"));
    check!(response.result().is_none());
}

#[tokio::test]
async fn test_without_status_validation_error_bodies_parse() {
    let (mock_server, service) = service().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&mock_server)
        .await;

    let response = service.server().json().load().await;

    check!(response.error().is_none());
    check!(response.result() == Some(&json!({"message": "boom"})));
}
