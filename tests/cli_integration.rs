//! CLI integration tests.
//!
//! These tests verify the CLI argument parsing and configuration loading.

use std::ffi::OsString;
use std::io::Write;
use tempfile::NamedTempFile;

use cookie_sessions::cli::{parse_args_from, Args};
use cookie_sessions::config::{Config, StoreBackend};

fn args(args: &[&str]) -> Vec<OsString> {
    std::iter::once("cookie-sessions")
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

    assert!(result.host.is_none());
    assert!(result.port.is_none());
    assert!(result.config.is_none());
    assert!(result.cookie_name.is_none());
    assert!(result.redis.is_none());
    assert!(!result.no_keep_empty);
}

#[test]
fn test_cli_full_options() {
    let result = parse_args_from(args(&[
        "-H",
        "0.0.0.0",
        "-p",
        "8080",
        "-n",
        "myapp_session",
        "-r",
        "10.0.0.5:6379",
        "-l",
        "debug",
        "--no-keep-empty",
        "--secure",
    ]))
    .unwrap();

    assert_eq!(result.host.unwrap().to_string(), "0.0.0.0");
    assert_eq!(result.port, Some(8080));
    assert_eq!(result.cookie_name, Some("myapp_session".to_string()));
    assert_eq!(result.redis, Some("10.0.0.5:6379".to_string()));
    assert_eq!(result.log_level, Some("debug".to_string()));
    assert!(result.no_keep_empty);
    assert!(result.secure);
}

#[test]
fn test_cli_config_file() {
    let result = parse_args_from(args(&["-c", "/etc/cookie-sessions.json"])).unwrap();

    assert!(result.config.is_some());
    assert_eq!(
        result.config.unwrap().to_str().unwrap(),
        "/etc/cookie-sessions.json"
    );
}

#[test]
fn test_cli_invalid_port() {
    let result = parse_args_from(args(&["-p", "not-a-number"]));
    assert!(result.is_err());
}

#[test]
fn test_cli_invalid_host() {
    let result = parse_args_from(args(&["-H", "not-an-ip"]));
    assert!(result.is_err());
}

#[test]
fn test_cli_unknown_flag() {
    let result = parse_args_from(args(&["--api-key", "secret"]));
    assert!(result.is_err());
}

// ============================================================================
// Configuration Loading Tests
// ============================================================================

#[test]
fn test_config_load_without_file() {
    let config = Config::load(&Args::default()).unwrap();

    assert_eq!(config.session.path, Some("/".to_string()));
    assert!(config.session.http_only);
}

#[test]
fn test_config_load_from_file() {
    let json = r#"{
        "server": { "port": 8081, "graceful_shutdown": false },
        "session": { "cookie_name": "from_file", "keep_empty": false },
        "logging": { "level": "warn" }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let cli = parse_args_from(args(&["-c", file.path().to_str().unwrap()])).unwrap();
    let config = Config::load(&cli).unwrap();

    assert_eq!(config.server.port, 8081);
    assert!(!config.session.keep_empty);

    let server_config = config.to_server_config().unwrap();
    assert!(!server_config.graceful_shutdown);
}

#[test]
fn test_cli_overrides_file() {
    let json = r#"{
        "server": { "port": 8081 },
        "store": { "backend": "memory" }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let cli = parse_args_from(args(&[
        "-c",
        file.path().to_str().unwrap(),
        "-p",
        "9090",
        "--redis",
        "127.0.0.1:6390",
    ]))
    .unwrap();
    let config = Config::load(&cli).unwrap();

    assert_eq!(config.server.port, 9090);
    assert_eq!(config.store.backend, StoreBackend::Redis);
    assert_eq!(config.store.address, "127.0.0.1:6390");
}

#[test]
fn test_config_missing_file() {
    let cli = parse_args_from(args(&["-c", "/nonexistent/cookie-sessions.json"])).unwrap();
    assert!(Config::load(&cli).is_err());
}

#[test]
fn test_config_invalid_json() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();

    let cli = parse_args_from(args(&["-c", file.path().to_str().unwrap()])).unwrap();
    let err = Config::load(&cli).unwrap_err();
    assert!(err.to_string().contains("parse"));
}

#[test]
fn test_config_unknown_backend() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(br#"{ "store": { "backend": "memcached" } }"#)
        .unwrap();

    let cli = parse_args_from(args(&["-c", file.path().to_str().unwrap()])).unwrap();
    assert!(Config::load(&cli).is_err());
}

#[test]
fn test_config_to_manager() {
    let cli = parse_args_from(args(&["-n", "app", "--no-keep-empty", "--secure"])).unwrap();
    let config = Config::load(&cli).unwrap();

    let store = config.build_store().unwrap();
    let manager = config.to_session_manager(store).unwrap();

    assert_eq!(manager.cookie_name(), "app");
    assert!(!manager.keep_empty());
    assert!(manager.cookie_options().secure);
}

#[test]
fn test_config_rejects_non_token_cookie_name() {
    let cli = parse_args_from(args(&["-n", "my session"])).unwrap();
    assert!(Config::load(&cli).is_err());
}
