use std::fs;
use std::time::Duration;

use tabguard_app::config::{ConfigError, HostConfig};
use tabguard_core::TextPolicy;
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let config = HostConfig::load(&temp.path().join("absent.ron")).unwrap();

    assert_eq!(config, HostConfig::default());
    assert_eq!(config.watcher_settings().text_policy, TextPolicy::default());
    assert!(config
        .watcher_settings()
        .known_safe
        .matches("https://www.google.com/search?q=x"));
}

#[test]
fn partial_file_overrides_only_given_fields() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tabguard.ron");
    fs::write(
        &path,
        r#"(
            endpoint: "https://classifier.example/analyze",
            request_timeout_ms: 2500,
            known_safe: [(host: "duckduckgo.com", path_prefix: "/")],
            text_policy: (min_length: 10),
            log_level: "debug",
        )"#,
    )
    .unwrap();

    let config = HostConfig::load(&path).unwrap();
    let classifier = config.classifier_settings();
    assert_eq!(classifier.endpoint, "https://classifier.example/analyze");
    assert_eq!(classifier.request_timeout, Duration::from_millis(2500));
    assert_eq!(classifier.connect_timeout, Duration::from_secs(5));

    let watcher = config.watcher_settings();
    assert!(watcher.known_safe.matches("https://duckduckgo.com/?q=x"));
    assert!(!watcher.known_safe.matches("https://www.google.com/search?q=x"));
    assert_eq!(watcher.text_policy.min_length, 10);
    assert_eq!(
        watcher.text_policy.hedging_phrases,
        TextPolicy::default().hedging_phrases
    );
    assert_eq!(config.log_level(), log::LevelFilter::Debug);
}

#[test]
fn unknown_level_falls_back_to_info() {
    let config = HostConfig {
        log_level: "chatty".to_string(),
        ..HostConfig::default()
    };
    assert_eq!(config.log_level(), log::LevelFilter::Info);
}

#[test]
fn invalid_file_reports_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.ron");
    fs::write(&path, "(endpoint: 42").unwrap();

    let err = HostConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
