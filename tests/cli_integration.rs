//! CLI integration tests.
//!
//! These tests verify argument parsing, configuration loading and running
//! commands against a stub backend.

mod common;

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::{NamedTempFile, TempDir};

use common::StubBackend;
use course_portal::cli::{parse_args_from, Args, Command};
use course_portal::config::{Config, ConfigError};
use course_portal::{ApiClient, App, SessionManager};

fn args(args: &[&str]) -> Vec<OsString> {
    std::iter::once("course-portal")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

// ============================================================================
// CLI Argument Tests
// ============================================================================

#[test]
fn test_cli_defaults() {
    let result = parse_args_from(args(&[])).unwrap();

    assert!(result.api_url.is_none());
    assert!(result.config.is_none());
    assert!(result.store.is_none());
    assert!(result.log_level.is_none());
    assert!(result.command.is_none());
}

#[test]
fn test_cli_full_options() {
    let result = parse_args_from(args(&[
        "-u",
        "http://10.0.0.5:8000",
        "-s",
        "/tmp/portal.json",
        "-l",
        "debug",
        "search",
        "redes",
    ]))
    .unwrap();

    assert_eq!(result.api_url.as_deref(), Some("http://10.0.0.5:8000"));
    assert_eq!(result.store, Some(PathBuf::from("/tmp/portal.json")));
    assert_eq!(result.log_level.as_deref(), Some("debug"));
    assert_eq!(result.command, Some(Command::Search(Some("redes".into()))));
}

#[test]
fn test_cli_config_file() {
    let result = parse_args_from(args(&["-c", "/etc/course-portal.json"])).unwrap();

    assert_eq!(
        result.config.unwrap().to_str().unwrap(),
        "/etc/course-portal.json"
    );
}

#[test]
fn test_cli_missing_option_value() {
    assert!(parse_args_from(args(&["-u"])).is_err());
}

// ============================================================================
// Configuration Loading Tests
// ============================================================================

#[test]
fn test_config_from_json_file() {
    let json = r#"{
        "api": {
            "base_url": "https://portal.example.edu",
            "timeout_secs": 5
        },
        "storage": {
            "path": "/var/lib/portal/session.json"
        },
        "logging": {
            "level": "debug"
        }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.api.base_url, "https://portal.example.edu");
    assert_eq!(config.api.timeout_secs, 5);
    assert_eq!(
        config.storage.path,
        Some(PathBuf::from("/var/lib/portal/session.json"))
    );
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_config_priority_cli_over_file() {
    let json = r#"{"api": {"base_url": "http://10.0.0.1:9000"}}"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let args = Args {
        api_url: Some("http://192.168.1.1:8000".to_string()),
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();
    assert_eq!(config.api.base_url, "http://192.168.1.1:8000");
}

#[test]
fn test_config_missing_file() {
    let args = Args {
        config: Some(PathBuf::from("/nonexistent/course-portal.json")),
        ..Args::default()
    };

    assert!(matches!(Config::load(&args), Err(ConfigError::Io(_))));
}

#[test]
fn test_config_malformed_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();

    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn test_config_to_client_config() {
    let args = Args {
        api_url: Some("https://portal.example.edu/backend/".to_string()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();
    let client = config.to_client_config().unwrap();

    assert_eq!(client.base_url.as_str(), "https://portal.example.edu/backend/");
}

#[test]
fn test_config_rejects_non_http_url() {
    let args = Args {
        api_url: Some("ftp://portal.example.edu".to_string()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();
    assert!(matches!(
        config.to_client_config(),
        Err(ConfigError::InvalidUrl(_))
    ));
}

// ============================================================================
// Configuration Serialization Tests
// ============================================================================

#[test]
fn test_config_partial_deserialization() {
    let json = r#"{"api": {"timeout_secs": 3}}"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.api.timeout_secs, 3);
    assert_eq!(config.api.base_url, "http://localhost:8000");
    assert!(config.storage.path.is_none());
    assert_eq!(config.logging.level, "info");
}

// ============================================================================
// Command Execution Tests
// ============================================================================

fn app_at(stub: &StubBackend, store: &std::path::Path) -> App {
    let args = Args {
        api_url: Some(stub.base_url.clone()),
        store: Some(store.to_path_buf()),
        ..Args::default()
    };
    let config = Config::load(&args).unwrap();
    let api = ApiClient::new(config.to_client_config().unwrap()).unwrap();
    App::new(Arc::new(SessionManager::hydrate(config.session_store())), api)
}

#[tokio::test]
async fn test_commands_share_session_across_runs() {
    let stub = StubBackend::start().await;
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("session.json");

    let login = Command::Login {
        username: "student1".into(),
        password: "pass123".into(),
    };
    let output = login.execute(&mut app_at(&stub, &store)).await.unwrap();
    assert!(output.contains("Exclusive Student Content"));

    let output = Command::Whoami
        .execute(&mut app_at(&stub, &store))
        .await
        .unwrap();
    assert_eq!(output, "student1 (student)");

    let output = Command::Open("/students".into())
        .execute(&mut app_at(&stub, &store))
        .await
        .unwrap();
    assert!(output.contains("Exclusive Student Content"));

    Command::Logout
        .execute(&mut app_at(&stub, &store))
        .await
        .unwrap();

    let output = Command::Whoami
        .execute(&mut app_at(&stub, &store))
        .await
        .unwrap();
    assert_eq!(output, "not signed in");
}

#[tokio::test]
async fn test_search_command_lists_matches() {
    let stub = StubBackend::start().await;
    let dir = TempDir::new().unwrap();

    let output = Command::Search(Some("math".into()))
        .execute(&mut app_at(&stub, &dir.path().join("session.json")))
        .await
        .unwrap();

    assert!(output.contains("Basic Mathematics"));
    assert!(!output.contains("Databases"));
}

#[tokio::test]
async fn test_open_rejects_unparseable_path() {
    let stub = StubBackend::start().await;
    let dir = TempDir::new().unwrap();

    let result = Command::Open("http://[::1".into())
        .execute(&mut app_at(&stub, &dir.path().join("session.json")))
        .await;

    assert!(result.is_err());
}
