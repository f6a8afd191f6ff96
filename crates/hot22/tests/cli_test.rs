//! Integration tests for the `hot22` CLI binary.
//!
//! Argument parsing, help, completions and config handling run without a
//! server; API-bound commands run against a `wiremock` stand-in.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Per-test home directory so runs never see the user's config or history.
struct Sandbox {
    home: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
        }
    }

    fn cmd(&self) -> assert_cmd::Command {
        let home = self.home.path();
        let mut cmd = cargo_bin_cmd!("hot22");
        cmd.env("HOME", home)
            .env("XDG_CONFIG_HOME", home.join("config"))
            .env("XDG_DATA_HOME", home.join("data"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("HOT22_PROFILE")
            .env_remove("HOT22_API_URL")
            .env_remove("HOT22_CONFIG")
            .env_remove("HOT22_OUTPUT")
            .env_remove("HOT22_DEV_MODE")
            .env_remove("HOT22_TIMEOUT");
        cmd
    }

    /// Command pointed at a mock API.
    fn api(&self, server: &MockServer) -> assert_cmd::Command {
        let mut cmd = self.cmd();
        cmd.args(["--api-url", &server.uri()]);
        cmd
    }

    fn config_file(&self) -> std::path::PathBuf {
        self.home.path().join("hot22.toml")
    }
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn offices_page() -> Value {
    json!({
        "data": [
            { "AGTN": "1000001", "name": "Viajes Sol", "city": "Madrid", "country": "ES",
              "status": "active", "totalTransactions": 12 },
            { "AGTN": "2000001", "name": "Iberviajes", "city": "Sevilla", "country": "ES",
              "status": "inactive", "totalTransactions": 3 }
        ],
        "pagination": {
            "currentPage": 1, "totalPages": 3, "totalRecords": 5,
            "hasNextPage": true, "hasPrevPage": false, "limit": 2
        }
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = Sandbox::new().cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    Sandbox::new().cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("HOT22")
            .and(predicate::str::contains("offices"))
            .and(predicate::str::contains("passengers"))
            .and(predicate::str::contains("errors")),
    );
}

#[test]
fn test_version_flag() {
    Sandbox::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hot22"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    Sandbox::new()
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    Sandbox::new()
        .cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    Sandbox::new()
        .cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = Sandbox::new().cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = Sandbox::new()
        .cmd()
        .args(["--output", "xml", "offices", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_bad_api_url_is_a_usage_error() {
    Sandbox::new()
        .cmd()
        .args(["--api-url", "ftp://example.com", "health"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("api_url"));
}

#[test]
fn test_unknown_profile_is_reported() {
    Sandbox::new()
        .cmd()
        .args(["--profile", "staging", "health"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

#[test]
fn test_inverted_date_range_is_rejected() {
    Sandbox::new()
        .cmd()
        .args([
            "passengers", "list", "--from", "2024-05-01", "--to", "2024-04-01",
        ])
        .assert()
        .code(2);
}

#[test]
fn test_search_requires_a_query() {
    let output = Sandbox::new().cmd().arg("search").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_without_a_file() {
    Sandbox::new()
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_path_honors_flag() {
    let sandbox = Sandbox::new();
    let file = sandbox.config_file();
    sandbox
        .cmd()
        .args(["--config", file.to_str().unwrap(), "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hot22.toml"));
}

#[test]
fn test_set_profile_then_use_it() {
    let sandbox = Sandbox::new();
    let file = sandbox.config_file();
    let file = file.to_str().unwrap();

    sandbox
        .cmd()
        .args([
            "--config", file, "config", "set-profile", "staging",
            "--api-url", "http://staging.local:3000", "--page-size", "25",
        ])
        .assert()
        .success();

    let written = std::fs::read_to_string(file).unwrap();
    assert!(written.contains("[profiles.staging]"), "{written}");
    assert!(written.contains("page_size = 25"), "{written}");
    assert!(written.contains(r#"default_profile = "staging""#), "{written}");

    sandbox
        .cmd()
        .args(["--config", file, "config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("staging *"));

    sandbox
        .cmd()
        .args(["--config", file, "config", "use", "production"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

#[test]
fn test_set_profile_rejects_bad_url() {
    let sandbox = Sandbox::new();
    let file = sandbox.config_file();
    sandbox
        .cmd()
        .args([
            "--config", file.to_str().unwrap(), "config", "set-profile", "bad",
            "--api-url", "not a url",
        ])
        .assert()
        .code(2);
    assert!(!file.exists());
}

// ── API-bound commands ──────────────────────────────────────────────

#[tokio::test]
async fn test_offices_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/offices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offices_page()))
        .mount(&server)
        .await;

    let output = Sandbox::new()
        .api(&server)
        .args(["-o", "json", "offices", "list"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body[0]["AGTN"], "1000001");
    assert_eq!(body[1]["city"], "Sevilla");
}

#[tokio::test]
async fn test_offices_list_table_and_footer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/offices"))
        .and(query_param("city", "Madrid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offices_page()))
        .mount(&server)
        .await;

    Sandbox::new()
        .api(&server)
        .args(["offices", "list", "--city", "Madrid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AGTN").and(predicate::str::contains("Viajes Sol")))
        .stderr(predicate::str::contains("Page 1 of 3 (5 records)"));
}

#[tokio::test]
async fn test_offices_list_plain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/offices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offices_page()))
        .mount(&server)
        .await;

    Sandbox::new()
        .api(&server)
        .args(["-o", "plain", "offices", "list"])
        .assert()
        .success()
        .stdout("1000001\n2000001\n");
}

#[tokio::test]
async fn test_office_not_found_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/offices/9999999"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "success": false, "message": "Office not found" })),
        )
        .mount(&server)
        .await;

    Sandbox::new()
        .api(&server)
        .args(["offices", "get", "9999999"])
        .assert()
        .code(4);
}

#[test]
fn test_connection_refused_exit_code() {
    Sandbox::new()
        .cmd()
        .args(["--api-url", "http://127.0.0.1:1", "--timeout", "2", "health"])
        .assert()
        .code(7);
}

#[tokio::test]
async fn test_unhealthy_service_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "degraded" })))
        .mount(&server)
        .await;

    Sandbox::new()
        .api(&server)
        .arg("health")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("degraded"));
}

#[tokio::test]
async fn test_cleanup_requires_yes_without_tty() {
    let server = MockServer::start().await;

    Sandbox::new()
        .api(&server)
        .args(["errors", "cleanup", "--days", "30"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cleanup_with_yes() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/error-logs/cleanup"))
        .and(query_param("daysOld", "30"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "deletedCount": 14 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = Sandbox::new()
        .api(&server)
        .args(["--yes", "-o", "json-compact", "errors", "cleanup", "--days", "30"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["affected"], 14);
}

#[tokio::test]
async fn test_search_history_survives_runs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "type": "office", "id": "1000001", "title": "Viajes Sol" }],
            "pagination": { "currentPage": 1, "totalPages": 1, "totalRecords": 1, "limit": 20 }
        })))
        .mount(&server)
        .await;

    let sandbox = Sandbox::new();
    sandbox
        .api(&server)
        .args(["-o", "plain", "search", "sol"])
        .assert()
        .success()
        .stdout("1000001\n");

    sandbox
        .cmd()
        .args(["-o", "plain", "search", "--history"])
        .assert()
        .success()
        .stdout("sol\n");

    sandbox
        .cmd()
        .args(["search", "--clear-history"])
        .assert()
        .success();
    sandbox
        .cmd()
        .args(["-o", "plain", "search", "--history"])
        .assert()
        .success()
        .stdout("");
}
