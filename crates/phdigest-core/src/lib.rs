pub mod app_config;
pub mod config;
pub mod days;
pub mod rows;

use thiserror::Error;

pub use app_config::{validate_export_prefix, AppConfig, Credentials, RunSettings, MAX_TOP_N};
pub use config::{load_app_config, load_app_config_from_env};
pub use days::{past_days, plan_days, DayWindow};
pub use rows::{ResultRow, COLUMNS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
