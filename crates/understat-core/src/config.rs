use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, SearchSettings};
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://understat.com/";
pub const DEFAULT_USER_AGENT: &str = "understat-scraper/0.1";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
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
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; decoupling the lookup lets tests feed a plain
/// `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let defaults = SearchSettings::default();

    let base_url = normalise_base_url(&or_default("UNDERSTAT_BASE_URL", DEFAULT_BASE_URL));
    let log_level = or_default("UNDERSTAT_LOG_LEVEL", "info");
    let request_timeout_secs = parse_var(&lookup, "UNDERSTAT_REQUEST_TIMEOUT_SECS", 30_u64)?;
    let user_agent = or_default("UNDERSTAT_USER_AGENT", DEFAULT_USER_AGENT);
    let fixture_dir = lookup("UNDERSTAT_FIXTURE_DIR")
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from);

    let search = SearchSettings {
        max_results: parse_var(&lookup, "UNDERSTAT_SEARCH_MAX_RESULTS", defaults.max_results)?,
        max_cycles: parse_var(&lookup, "UNDERSTAT_SEARCH_MAX_CYCLES", defaults.max_cycles)?,
        step_wait_ms: parse_var(&lookup, "UNDERSTAT_SEARCH_STEP_WAIT_MS", defaults.step_wait_ms)?,
        poll_interval_ms: parse_var(
            &lookup,
            "UNDERSTAT_SEARCH_POLL_INTERVAL_MS",
            defaults.poll_interval_ms,
        )?,
        budget_secs: parse_var(&lookup, "UNDERSTAT_SEARCH_BUDGET_SECS", defaults.budget_secs)?,
        headless: parse_var(&lookup, "UNDERSTAT_SEARCH_HEADLESS", defaults.headless)?,
    };

    if search.max_results == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "UNDERSTAT_SEARCH_MAX_RESULTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        fixture_dir,
        search,
    })
}

/// Parses `var` if present, otherwise returns `default`.
fn parse_var<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

/// Ensures the base URL ends with exactly one slash so path segments can be
/// appended directly.
fn normalise_base_url(raw: &str) -> String {
    format!("{}/", raw.trim().trim_end_matches('/'))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
