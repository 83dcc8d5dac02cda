//! End-to-end tests of both binaries: exit codes, stdout data and the batch
//! output file, against a mock dataset API.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use formulary_fetch::config::{api, batch};

fn data_path() -> String {
    format!("/data-api/v1/dataset/{}/data", api::DATASET_ID)
}

/// Runs `bin` from an empty directory, pointed at the mock server.
fn command(bin: &str, server: &MockServer, dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(bin).unwrap();
    cmd.current_dir(dir.path())
        .env("FORMULARY_API_BASE_URL", format!("{}/data-api/v1/dataset", server.uri()))
        .env_remove("FORMULARY_DATASET_ID")
        .env("RUST_LOG", "info")
        .env("NO_COLOR", "1");
    cmd
}

fn occurrences(haystack: &[u8], needle: &str) -> usize {
    String::from_utf8_lossy(haystack).matches(needle).count()
}

// =============================================================================
// formulary-fetch
// =============================================================================

#[tokio::test]
async fn test_fetch_success_writes_csv_to_stdout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(data_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"organization_name": "Humana Inc.", "state": "FL"},
            {"organization_name": "Aetna", "state": "CA"}
        ])))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    command("formulary-fetch", &server, &dir)
        .args(["--size", "2"])
        .assert()
        .success()
        .stdout("organization_name,state\nHumana Inc.,FL\nAetna,CA\n");
}

#[tokio::test]
async fn test_fetch_logs_count_before_filtering() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(data_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"organization_name": "Humana Inc.", "state": "FL"},
            {"organization_name": "Aetna", "state": "CA"}
        ])))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    command("formulary-fetch", &server, &dir)
        .args(["--state", "FL"])
        .assert()
        .success()
        .stdout("organization_name,state\nHumana Inc.,FL\n")
        .stderr(predicate::str::contains("Retrieved 2 records"));
}

#[tokio::test]
async fn test_fetch_server_error_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(data_path()))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    command("formulary-fetch", &server, &dir)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error fetching data"))
        .stderr(predicate::str::contains("HTTP Error 500"));
}

// =============================================================================
// fetch-florida-mapd
// =============================================================================

#[tokio::test]
async fn test_batch_without_matches_writes_no_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(data_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(batch::ORGANIZATIONS.len() as u64)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    command("fetch-florida-mapd", &server, &dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("No matching records found"));

    assert!(!dir.path().join(batch::OUTPUT_FILE).exists());
}

#[tokio::test]
async fn test_batch_writes_matches_to_output_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(data_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"organization_name": "Humana Inc.", "state": "FL", "drug_name": "Aspirin"},
            {"organization_name": "Humana Inc.", "state": "GA", "drug_name": "Aspirin"}
        ])))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    command("fetch-florida-mapd", &server, &dir).assert().success().stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(dir.path().join(batch::OUTPUT_FILE)).unwrap();
    assert_eq!(written, "drug_name,organization_name,state\nAspirin,Humana Inc.,FL\n");
}

#[tokio::test]
async fn test_batch_failures_warn_once_per_organization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(data_path()))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let output = command("fetch-florida-mapd", &server, &dir).assert().success().get_output().clone();

    assert_eq!(
        occurrences(&output.stderr, "Error fetching organization, skipping"),
        batch::ORGANIZATIONS.len()
    );
    assert_eq!(occurrences(&output.stderr, "Skipped after fetch errors"), 1);
    assert!(!dir.path().join(batch::OUTPUT_FILE).exists());
}
