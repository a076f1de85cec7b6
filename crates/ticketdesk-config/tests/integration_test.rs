//! Integration tests for ticketdesk-config crate.

use std::io::Write;
use ticketdesk_common::logging::LogFormat;
use ticketdesk_common::test_utils::config_fixtures;
use ticketdesk_config::{Config, ConfigError, ConfigLoader};

#[test]
fn test_minimal_yaml_fills_defaults() {
    let config = ConfigLoader::parse(config_fixtures::minimal_config_yaml()).unwrap();

    assert_eq!(config.discord.token, "test_token");
    assert_eq!(config.storage.data_dir, "data");
    assert_eq!(config.web, Config::default().web);
    assert!(config.validate_for_bot().is_ok());
}

#[test]
fn test_full_yaml() {
    let config = ConfigLoader::parse(config_fixtures::full_config_yaml()).unwrap();

    assert_eq!(config.discord.request_timeout_seconds, 15);
    assert_eq!(config.storage.data_dir, "/var/lib/ticketdesk");
    assert_eq!(config.web.bind_address, "127.0.0.1:8080");
    assert_eq!(config.web.default_admin_password, "change-me");
    assert_eq!(
        config.web.ban_check_url.as_deref(),
        Some("http://127.0.0.1:8080/api/check-banned")
    );

    let logging = config.logging.to_logging_config();
    assert_eq!(logging.level, "debug");
    assert_eq!(logging.format, LogFormat::Json);
    assert_eq!(logging.file_path.as_deref(), Some("logs/ticketdesk.log"));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "discord:\n  request_timeout_seconds: 42").unwrap();

    let config = ConfigLoader::load(Some(file.path())).unwrap();
    assert_eq!(config.discord.request_timeout_seconds, 42);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigLoader::load_config(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_malformed_yaml_is_parse_error() {
    let err = ConfigLoader::parse("discord: [unterminated").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_unknown_log_format_falls_back_to_pretty() {
    let config = ConfigLoader::parse("logging:\n  format: fancy\n").unwrap();
    assert_eq!(config.logging.to_logging_config().format, LogFormat::Pretty);
}
