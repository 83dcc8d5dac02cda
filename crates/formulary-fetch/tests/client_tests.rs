//! Data source client tests against a mock dataset API.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use formulary_fetch::config::api;
use formulary_fetch::{ClientError, Config, FormularyClient};

fn data_path() -> String {
    format!("/data-api/v1/dataset/{}/data", api::DATASET_ID)
}

fn client_for(mock_server: &MockServer) -> FormularyClient {
    FormularyClient::new(Config::for_testing(&mock_server.uri())).unwrap()
}

#[tokio::test]
async fn test_fetch_returns_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(data_path()))
        .and(query_param("size", "2"))
        .and(query_param("offset", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"contract_id": "H1234", "organization_name": "Humana Inc.", "state": "FL"},
            {"contract_id": "H5678", "organization_name": "Aetna", "state": "CA", "tier": 3}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let records = client_for(&mock_server).fetch(Some(2), Some(10)).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].organization_name(), Some("Humana Inc."));
    assert_eq!(records[1].get("tier"), Some("3"));
}

#[tokio::test]
async fn test_fetch_without_params_sends_bare_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(data_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let records = client_for(&mock_server).fetch(None, None).await.unwrap();
    assert!(records.is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_fetch_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(data_path()))
        .and(header("user-agent", api::USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    client_for(&mock_server).fetch(Some(1), None).await.unwrap();
}

#[tokio::test]
async fn test_server_error_is_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(data_path()))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).fetch(Some(10), None).await.unwrap_err();

    assert!(matches!(err, ClientError::Status { status: 500, .. }), "got {err:?}");
    assert!(err.is_server_error());
    assert_eq!(err.to_string(), "HTTP Error 500: Internal Server Error");
}

#[tokio::test]
async fn test_not_found_is_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(data_path()))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).fetch(None, None).await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert!(!err.is_server_error());
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(data_path()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).fetch(None, None).await.unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_object_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(data_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).fetch(None, None).await.unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_connection_refused_is_http_error() {
    // Bind then release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = FormularyClient::new(Config::for_testing(&uri)).unwrap();
    let err = client.fetch(None, None).await.unwrap_err();

    assert!(matches!(err, ClientError::Http(_)), "got {err:?}");
    assert_eq!(err.status_code(), None);
}
