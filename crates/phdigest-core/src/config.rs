use crate::app_config::{validate_export_prefix, AppConfig, Credentials, RunSettings};
use crate::ConfigError;

/// Credentials file read before the regular `.env`.
const CREDENTIALS_ENV_FILE: &str = "producthunt.env";

/// Load application configuration from environment variables.
///
/// Loads `producthunt.env` and then `.env` (both optional) before reading
/// env vars. Values already present in the process environment win.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::from_filename(CREDENTIALS_ENV_FILE).ok();
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
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
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

    let client_id = require("PRODUCTHUNT_CLIENT_ID")?;
    let client_secret = require("PRODUCTHUNT_CLIENT_SECRET")?;
    let credentials = Credentials::new(client_id, client_secret)?;

    let bind_addr = or_default("PHDIGEST_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("PHDIGEST_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("PHDIGEST_LOG_LEVEL", "info");
    let api_base_url = or_default("PHDIGEST_API_BASE_URL", "https://api.producthunt.com");

    let days = parse_usize("PHDIGEST_DAYS", "21")?;
    let top_n = parse_usize("PHDIGEST_TOP_N", "10")?;
    let run = RunSettings::new(days, top_n)?;

    let request_timeout_secs = parse_u64("PHDIGEST_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PHDIGEST_USER_AGENT", "phdigest/0.1 (daily-rankings)");
    let export_prefix =
        validate_export_prefix(or_default("PHDIGEST_EXPORT_PREFIX", "producthunt_top_products"))?;
    let output_dir = PathBuf::from(or_default("PHDIGEST_OUTPUT_DIR", "."));

    Ok(AppConfig {
        credentials,
        bind_addr,
        log_level,
        api_base_url,
        run,
        request_timeout_secs,
        user_agent,
        export_prefix,
        output_dir,
    })
}
