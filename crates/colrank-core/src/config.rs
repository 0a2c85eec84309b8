use crate::app_config::{bare_shop_domain, AppConfig, Environment};
use crate::ConfigError;

/// Shopify caps connection page sizes at 250.
const MAX_RANK_PAGE_SIZE: u32 = 250;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("COLRANK_ENV", "development"))?;

    let bind_addr = or_default("COLRANK_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("COLRANK_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("COLRANK_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("COLRANK_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("COLRANK_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("COLRANK_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let shopify_shop_domain = optional("SHOPIFY_SHOP_DOMAIN").map(|d| bare_shop_domain(&d));
    let shopify_access_token = optional("SHOPIFY_ACCESS_TOKEN");
    let shopify_api_version = or_default("SHOPIFY_API_VERSION", "2024-10");
    let shopify_admin_base_url = optional("COLRANK_SHOPIFY_ADMIN_BASE_URL");
    let shopify_request_timeout_secs = parse_u64("COLRANK_SHOPIFY_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("COLRANK_USER_AGENT", "colrank/0.1 (collection-rank-sync)");

    let rank_namespace = or_default("COLRANK_RANK_NAMESPACE", "custom");
    if rank_namespace.trim().is_empty() {
        return Err(invalid(
            "COLRANK_RANK_NAMESPACE",
            "namespace must not be empty".to_string(),
        ));
    }

    let rank_page_size = parse_u32("COLRANK_RANK_PAGE_SIZE", "100")?;
    if !(1..=MAX_RANK_PAGE_SIZE).contains(&rank_page_size) {
        return Err(invalid(
            "COLRANK_RANK_PAGE_SIZE",
            format!("must be between 1 and {MAX_RANK_PAGE_SIZE}, got {rank_page_size}"),
        ));
    }
    let rank_max_products = parse_usize("COLRANK_RANK_MAX_PRODUCTS", "0")?;
    let stamp_last_rendered = parse_bool("COLRANK_STAMP_LAST_RENDERED", "true")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        shopify_shop_domain,
        shopify_access_token,
        shopify_api_version,
        shopify_admin_base_url,
        shopify_request_timeout_secs,
        user_agent,
        rank_namespace,
        rank_page_size,
        rank_max_products,
        stamp_last_rendered,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "COLRANK_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
