use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_API_BASE_URL: &str = "/api";
const DEFAULT_API_ORIGIN: &str = "http://127.0.0.1:8000";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Both store and aggregation settings are optional: an absent `DATABASE_URL`
/// yields an empty string and an absent `TRENDBOARD_API_BASE_URL` yields
/// `/api`, joined onto `TRENDBOARD_API_ORIGIN`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = or_default("DATABASE_URL", "");
    let env = parse_environment(&or_default("TRENDBOARD_ENV", "development"))?;

    let bind_addr = or_default("TRENDBOARD_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("TRENDBOARD_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("TRENDBOARD_LOG_LEVEL", "info");

    let api_base_url = resolve_api_base(
        &or_default("TRENDBOARD_API_BASE_URL", DEFAULT_API_BASE_URL),
        &or_default("TRENDBOARD_API_ORIGIN", DEFAULT_API_ORIGIN),
    )?;

    let db_max_connections = parse_u32("TRENDBOARD_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("TRENDBOARD_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("TRENDBOARD_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let http_timeout_secs = parse_u64("TRENDBOARD_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TRENDBOARD_USER_AGENT", "trendboard/0.1 (dashboard)");
    let stale_time_secs = parse_u64("TRENDBOARD_STALE_TIME_SECS", "30")?;
    let render_budget_ms = parse_u64("TRENDBOARD_RENDER_BUDGET_MS", "2000")?;

    Ok(AppConfig {
        database_url,
        api_base_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        http_timeout_secs,
        user_agent,
        stale_time_secs,
        render_budget_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TRENDBOARD_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Turn the configured aggregation base into an absolute URL.
///
/// Absolute `http(s)://` bases pass through with trailing slashes trimmed.
/// Relative bases (`/api`) are joined onto `origin`.
fn resolve_api_base(base: &str, origin: &str) -> Result<String, ConfigError> {
    let base = base.trim();
    if base.starts_with("http://") || base.starts_with("https://") {
        return Ok(base.trim_end_matches('/').to_string());
    }

    let origin = origin.trim().trim_end_matches('/');
    if !(origin.starts_with("http://") || origin.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRENDBOARD_API_ORIGIN".to_string(),
            reason: format!("'{origin}' is not an http(s) origin"),
        });
    }

    let path = base.trim_matches('/');
    if path.is_empty() {
        Ok(origin.to_string())
    } else {
        Ok(format!("{origin}/{path}"))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
