use super::backend::BackendConfig;
use super::data::Config;
use super::defaults::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::api::ConfigResponse;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        api_base_url: Some("http://hr-bot.internal:9000".to_string()),
        request_timeout_secs: Some(15),
        theme: Some("light".to_string()),
        default_user: Some("Bob".to_string()),
        ..Default::default()
    };
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);

    let mut modified = loaded;
    modified.default_user = None;
    modified.markdown = Some(false);
    modified
        .save_to_path(&config_path)
        .expect("Failed to save modified config");
    let reloaded = Config::load_from_path(&config_path).expect("Failed to reload config");
    assert_eq!(reloaded.default_user, None);
    assert!(!reloaded.markdown_enabled());
}

#[test]
fn test_invalid_toml_reports_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "api_base_url = [not toml").unwrap();

    let err = Config::load_from_path(&config_path).expect_err("parse should fail");
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn api_base_url_precedence() {
    assert_eq!(
        Config::pick_api_base_url(Some("http://cli"), Some("http://env"), Some("http://file")),
        "http://cli"
    );
    assert_eq!(
        Config::pick_api_base_url(None, Some("http://env"), Some("http://file")),
        "http://env"
    );
    assert_eq!(
        Config::pick_api_base_url(Some("  "), None, Some("http://file")),
        "http://file"
    );
    assert_eq!(Config::pick_api_base_url(None, None, None), DEFAULT_API_BASE_URL);
}

#[test]
fn zero_timeout_falls_back_to_default() {
    let config = Config {
        request_timeout_secs: Some(0),
        ..Default::default()
    };
    assert_eq!(
        config.request_timeout(),
        Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
    );
}

#[test]
fn backend_default_is_empty() {
    let cfg = BackendConfig::default();
    assert!(cfg.users.is_empty());
    assert!(cfg.models.is_empty());
    assert!(!cfg.memory_toggle_enabled());
}

#[test]
fn backend_fallback_is_usable() {
    let cfg = BackendConfig::fallback();
    assert_eq!(cfg.users.first().map(String::as_str), Some("Alice"));
    assert_eq!(cfg.models.first().map(String::as_str), Some("Ollama"));
    assert!(cfg.memory_toggle_enabled());
}

#[test]
fn backend_config_drops_blank_entries() {
    let cfg = BackendConfig::from(ConfigResponse {
        models: vec!["GPT-4".into(), " ".into()],
        users: vec![" Eve ".into()],
        features: vec![],
    });
    assert_eq!(cfg.models, vec!["GPT-4"]);
    assert!(cfg.has_user("Eve"));
    assert!(!cfg.has_feature("memory_toggle"));
}
