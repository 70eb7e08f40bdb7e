use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "CAFEVERSE_ENV"));
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.api_base_url, "http://127.0.0.1:8000");
    assert_eq!(cfg.data_dir.to_string_lossy(), "./.cafeverse");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.http_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "cafeverse/0.1 (storefront)");
    assert_eq!(cfg.read_max_retries, 3);
    assert_eq!(cfg.read_backoff_base_ms, 500);
    assert_eq!(cfg.confirmation_countdown_secs, 20);
}

#[test]
fn build_app_config_applies_overrides() {
    let mut map = HashMap::new();
    map.insert("CAFEVERSE_ENV", "production");
    map.insert("CAFEVERSE_API_BASE_URL", "https://orders.example.com");
    map.insert("CAFEVERSE_DATA_DIR", "/var/lib/cafeverse");
    map.insert("CAFEVERSE_READ_MAX_RETRIES", "0");
    map.insert("CAFEVERSE_CONFIRMATION_COUNTDOWN_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.api_base_url, "https://orders.example.com");
    assert_eq!(cfg.data_dir.to_string_lossy(), "/var/lib/cafeverse");
    assert_eq!(cfg.read_max_retries, 0);
    assert_eq!(cfg.confirmation_countdown_secs, 5);
}

#[test]
fn build_app_config_rejects_non_http_base_url() {
    let mut map = HashMap::new();
    map.insert("CAFEVERSE_API_BASE_URL", "ftp://orders.example.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CAFEVERSE_API_BASE_URL"),
        "expected InvalidEnvVar(CAFEVERSE_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("CAFEVERSE_HTTP_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CAFEVERSE_HTTP_TIMEOUT_SECS"),
        "expected InvalidEnvVar(CAFEVERSE_HTTP_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_backoff() {
    let mut map = HashMap::new();
    map.insert("CAFEVERSE_READ_BACKOFF_BASE_MS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CAFEVERSE_READ_BACKOFF_BASE_MS"),
        "expected InvalidEnvVar(CAFEVERSE_READ_BACKOFF_BASE_MS), got: {result:?}"
    );
}

#[test]
fn build_app_config_accepts_zero_countdown() {
    let mut map = HashMap::new();
    map.insert("CAFEVERSE_CONFIRMATION_COUNTDOWN_SECS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.confirmation_countdown_secs, 0);
}

#[test]
fn build_app_config_rejects_negative_countdown() {
    let mut map = HashMap::new();
    map.insert("CAFEVERSE_CONFIRMATION_COUNTDOWN_SECS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CAFEVERSE_CONFIRMATION_COUNTDOWN_SECS"),
        "expected InvalidEnvVar(CAFEVERSE_CONFIRMATION_COUNTDOWN_SECS), got: {result:?}"
    );
}

#[test]
fn debug_output_lists_base_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(debug.contains("api_base_url"));
    assert!(debug.contains("127.0.0.1:8000"));
}
