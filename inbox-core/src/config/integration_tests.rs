//! # Configuration Integration Tests
//!
//! Loading configuration files of every supported format and layering the
//! `INBOX_*` environment variables on top.

use super::*;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

fn cleanup_env_vars() {
    unsafe {
        env::remove_var("INBOX_BLOCKED_ASSIGNEES");
        env::remove_var("INBOX_LOG_LEVEL");
        env::remove_var("INBOX_LOG_FORMAT");
        env::remove_var("INBOX_DEDUP_COMPACTION");
    }
}

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn test_load_config_without_file_uses_defaults() {
    cleanup_env_vars();
    let config = Config::load_config(None).unwrap();
    assert_eq!(config, Config::with_defaults());
}

#[test]
#[serial]
fn test_load_toml_file() {
    cleanup_env_vars();
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "inbox.toml",
        r#"
blocked_assignees = ["John_Doe", "bot"]

[dedup]
compact_below_watermark = false

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = Config::load_config(Some(&path)).unwrap();
    assert_eq!(config.blocked_assignees, ["John_Doe", "bot"]);
    assert!(!config.dedup.compact_below_watermark);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
#[serial]
fn test_load_partial_yaml_file_keeps_defaults() {
    cleanup_env_vars();
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "inbox.yaml", "blocked_assignees:\n  - John_Doe\n");

    let config = Config::load_config(Some(&path)).unwrap();
    assert_eq!(config.blocked_assignees, ["John_Doe"]);
    assert!(config.dedup.compact_below_watermark);
    assert_eq!(config.logging, LoggingConfig::default());
}

#[test]
#[serial]
fn test_load_json_file() {
    cleanup_env_vars();
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "inbox.json",
        r#"{ "logging": { "level": "warn" } }"#,
    );

    let config = Config::load_config(Some(&path)).unwrap();
    assert_eq!(config.logging.level, "warn");
    assert!(config.blocked_assignees.is_empty());
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "inbox.ini", "level=info");

    let err = Config::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "ini"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
#[serial]
fn test_invalid_file_is_rejected_by_validation() {
    cleanup_env_vars();
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "inbox.toml", "[logging]\nlevel = \"shouting\"\n");

    let err = Config::load_config(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(errors) if errors.len() == 1));
}

#[test]
#[serial]
fn test_environment_overrides_defaults() {
    cleanup_env_vars();
    unsafe {
        env::set_var("INBOX_BLOCKED_ASSIGNEES", "John_Doe, bot ,,");
        env::set_var("INBOX_LOG_LEVEL", "trace");
        env::set_var("INBOX_LOG_FORMAT", "json");
        env::set_var("INBOX_DEDUP_COMPACTION", "false");
    }

    let config = Config::load_config(None).unwrap();
    assert_eq!(config.blocked_assignees, ["John_Doe", "bot"]);
    assert_eq!(config.logging.level, "trace");
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(!config.dedup.compact_below_watermark);

    cleanup_env_vars();
}

#[test]
#[serial]
fn test_file_values_win_over_environment() {
    cleanup_env_vars();
    unsafe {
        env::set_var("INBOX_BLOCKED_ASSIGNEES", "from_env");
    }
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "inbox.toml", "blocked_assignees = [\"from_file\"]\n");

    let config = Config::load_config(Some(&path)).unwrap();
    assert_eq!(config.blocked_assignees, ["from_file"]);

    cleanup_env_vars();
}

#[test]
#[serial]
fn test_invalid_environment_value() {
    cleanup_env_vars();
    unsafe {
        env::set_var("INBOX_DEDUP_COMPACTION", "sometimes");
    }

    let err = Config::load_config(None).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidEnv { var: "INBOX_DEDUP_COMPACTION", .. }
    ));

    cleanup_env_vars();
}

#[test]
fn test_render_round_trips_through_every_format() {
    let mut config = Config::with_defaults();
    config.blocked_assignees = vec!["John_Doe".into()];

    let toml_text = config.render("toml").unwrap();
    assert_eq!(toml::from_str::<Config>(&toml_text).unwrap(), config);

    let yaml_text = config.render("yaml").unwrap();
    assert_eq!(serde_yml::from_str::<Config>(&yaml_text).unwrap(), config);

    let json_text = config.render("json").unwrap();
    assert_eq!(serde_json::from_str::<Config>(&json_text).unwrap(), config);
}
