use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a plain `HashMap`.
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

    let env = parse_environment(&or_default("VINVAL_ENV", "development"))?;
    let log_level = or_default("VINVAL_LOG_LEVEL", "info");

    let marketcheck_api_key = lookup("MARKETCHECK_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let marketcheck_base_url = or_default(
        "VINVAL_MARKETCHECK_BASE_URL",
        "https://mc-api.marketcheck.com",
    );

    let request_timeout_secs = parse_u64("VINVAL_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("VINVAL_USER_AGENT", "vinval/0.1 (vehicle-valuation)");

    let max_attempts = parse_u32("VINVAL_MAX_ATTEMPTS", "3")?;
    if max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "VINVAL_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let backoff_base_ms = parse_u64("VINVAL_BACKOFF_BASE_MS", "1000")?;
    let backoff_max_ms = parse_u64("VINVAL_BACKOFF_MAX_MS", "8000")?;

    let search_radius_miles = parse_u32("VINVAL_SEARCH_RADIUS_MILES", "100")?;
    let search_rows = parse_u32("VINVAL_SEARCH_ROWS", "50")?;

    let report_sections_path = PathBuf::from(or_default(
        "VINVAL_REPORT_SECTIONS_PATH",
        "./config/report_sections.yaml",
    ));

    Ok(AppConfig {
        env,
        log_level,
        marketcheck_api_key,
        marketcheck_base_url,
        request_timeout_secs,
        user_agent,
        max_attempts,
        backoff_base_ms,
        backoff_max_ms,
        search_radius_miles,
        search_rows,
        report_sections_path,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VINVAL_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}
