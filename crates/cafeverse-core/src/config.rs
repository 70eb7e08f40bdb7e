use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables already in the process.
///
/// Reading a `.env` file is left to the binary, before this is called.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every storefront setting has a default, so only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("CAFEVERSE_ENV", "development"))?;

    let api_base_url = or_default("CAFEVERSE_API_BASE_URL", "http://127.0.0.1:8000");
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "CAFEVERSE_API_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{api_base_url}'"),
        });
    }

    let data_dir = PathBuf::from(or_default("CAFEVERSE_DATA_DIR", "./.cafeverse"));
    let log_level = or_default("CAFEVERSE_LOG_LEVEL", "info");
    let http_timeout_secs = parse_u64("CAFEVERSE_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("CAFEVERSE_USER_AGENT", "cafeverse/0.1 (storefront)");
    let read_max_retries = parse_u32("CAFEVERSE_READ_MAX_RETRIES", "3")?;
    let read_backoff_base_ms = parse_u64("CAFEVERSE_READ_BACKOFF_BASE_MS", "500")?;
    let confirmation_countdown_secs = parse_u32("CAFEVERSE_CONFIRMATION_COUNTDOWN_SECS", "20")?;

    Ok(AppConfig {
        env,
        api_base_url,
        data_dir,
        log_level,
        http_timeout_secs,
        user_agent,
        read_max_retries,
        read_backoff_base_ms,
        confirmation_countdown_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CAFEVERSE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
