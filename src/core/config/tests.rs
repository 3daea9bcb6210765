use super::data::Config;
use super::defaults::DEFAULT_BASE_URL;
use super::io::ConfigError;
use super::keys::{ConfigKey, ConfigValueError};
use crate::core::fallback::FALLBACK_LATENCY;
use crate::core::persona::Persona;
use std::fs;
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
        base_url: Some("https://chat.internal/api".to_string()),
        default_persona: Some("infra".to_string()),
        multiplier: Some(4),
        ..Default::default()
    };
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");

    let mut loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);

    ConfigKey::Multiplier.clear(&mut loaded);
    ConfigKey::Merchant
        .apply(&mut loaded, "m-204")
        .expect("merchant applies");
    loaded
        .save_to_path(&config_path)
        .expect("Failed to save config");

    let reloaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(reloaded.multiplier, None);
    assert_eq!(reloaded.merchant_id.as_deref(), Some("m-204"));
    assert_eq!(reloaded.default_persona.as_deref(), Some("infra"));
}

#[test]
fn test_invalid_toml_reports_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "multiplier = \"four\"\n").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn test_resolved_defaults() {
    let config = Config::default();
    assert_eq!(config.base_url_with_override(None), DEFAULT_BASE_URL);
    assert_eq!(config.resolved_persona(), Persona::Growth);
    assert_eq!(config.context_params().multiplier, 1);
    assert_eq!(config.request_timeout(), None);
    assert_eq!(config.fallback_latency(), FALLBACK_LATENCY);
}

#[test]
fn test_env_base_url_overrides_config() {
    let config = Config {
        base_url: Some("http://from-config".to_string()),
        ..Default::default()
    };
    assert_eq!(config.base_url_with_override(None), "http://from-config");
    assert_eq!(
        config.base_url_with_override(Some("http://from-env".to_string())),
        "http://from-env"
    );
    assert_eq!(
        config.base_url_with_override(Some("  ".to_string())),
        "http://from-config"
    );
}

#[test]
fn test_resolved_values_from_config() {
    let config = Config {
        default_persona: Some("Platform Architect".to_string()),
        merchant_id: Some("m-1".to_string()),
        multiplier: Some(6),
        timeout_secs: Some(0),
        fallback_latency_ms: Some(25),
        ..Default::default()
    };
    assert_eq!(config.resolved_persona(), Persona::Infrastructure);
    let params = config.context_params();
    assert_eq!(params.merchant_id.as_deref(), Some("m-1"));
    assert_eq!(params.multiplier, 6);
    assert_eq!(config.request_timeout(), None);
    assert_eq!(config.fallback_latency(), Duration::from_millis(25));

    let unknown = Config {
        default_persona: Some("marketing".to_string()),
        ..Default::default()
    };
    assert_eq!(unknown.resolved_persona(), Persona::Growth);
}

#[test]
fn test_config_keys_parse_and_validate() {
    assert_eq!("base_url".parse::<ConfigKey>(), Ok(ConfigKey::BaseUrl));
    assert_eq!(
        "Fallback-Latency".parse::<ConfigKey>(),
        Ok(ConfigKey::FallbackLatency)
    );
    assert!(matches!(
        "theme".parse::<ConfigKey>(),
        Err(ConfigValueError::UnknownKey(_))
    ));

    let mut config = Config::default();
    assert!(ConfigKey::Multiplier.apply(&mut config, "0").is_err());
    assert!(ConfigKey::BaseUrl.apply(&mut config, "localhost").is_err());
    assert!(ConfigKey::DefaultPersona
        .apply(&mut config, "marketing")
        .is_err());
    assert_eq!(config, Config::default());

    ConfigKey::DefaultPersona
        .apply(&mut config, "Operations Engineer")
        .unwrap();
    assert_eq!(config.default_persona.as_deref(), Some("ops"));
    ConfigKey::Timeout.apply(&mut config, "30").unwrap();
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));

    let err = ConfigKey::Multiplier.apply(&mut config, "-2").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid value '-2' for multiplier: expected a positive integer"
    );
}
