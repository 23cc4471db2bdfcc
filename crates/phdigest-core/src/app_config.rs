use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ConfigError;

/// Page size requested from the `posts` query; `top_n` may not exceed it.
pub const MAX_TOP_N: usize = 10;

/// OAuth client credentials exchanged for a bearer token once per run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Builds credentials, rejecting blank values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] naming the offending variable
    /// when either value is empty or whitespace-only.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        if client_id.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: "PRODUCTHUNT_CLIENT_ID".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if client_secret.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: "PRODUCTHUNT_CLIENT_SECRET".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            client_id,
            client_secret,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

/// How many days to walk back and how many entries to keep per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    days: usize,
    top_n: usize,
}

impl RunSettings {
    pub const DEFAULT_DAYS: usize = 21;
    pub const DEFAULT_TOP_N: usize = 10;

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if `days` is zero or `top_n`
    /// is outside `1..=MAX_TOP_N`.
    pub fn new(days: usize, top_n: usize) -> Result<Self, ConfigError> {
        if days == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: "PHDIGEST_DAYS".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if top_n == 0 || top_n > MAX_TOP_N {
            return Err(ConfigError::InvalidEnvVar {
                var: "PHDIGEST_TOP_N".to_string(),
                reason: format!("must be between 1 and {MAX_TOP_N} (the query page size)"),
            });
        }
        Ok(Self { days, top_n })
    }

    #[must_use]
    pub fn days(&self) -> usize {
        self.days
    }

    #[must_use]
    pub fn top_n(&self) -> usize {
        self.top_n
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            days: Self::DEFAULT_DAYS,
            top_n: Self::DEFAULT_TOP_N,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub api_base_url: String,
    pub run: RunSettings,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub export_prefix: String,
    pub output_dir: PathBuf,
}

impl AppConfig {
    /// Returns a copy with `days` / `top_n` replaced where given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if the resulting settings are
    /// out of range.
    pub fn with_run_overrides(
        &self,
        days: Option<usize>,
        top_n: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let run = RunSettings::new(
            days.unwrap_or(self.run.days()),
            top_n.unwrap_or(self.run.top_n()),
        )?;
        Ok(Self {
            run,
            ..self.clone()
        })
    }

    /// Returns a copy with the export directory / file prefix replaced where
    /// given. The prefix gets the same check as `PHDIGEST_EXPORT_PREFIX`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if `prefix` is blank.
    pub fn with_export_overrides(
        &self,
        output_dir: Option<PathBuf>,
        prefix: Option<String>,
    ) -> Result<Self, ConfigError> {
        let export_prefix = match prefix {
            Some(prefix) => validate_export_prefix(prefix)?,
            None => self.export_prefix.clone(),
        };
        Ok(Self {
            export_prefix,
            output_dir: output_dir.unwrap_or_else(|| self.output_dir.clone()),
            ..self.clone()
        })
    }
}

/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] if the prefix is empty or
/// whitespace-only.
pub fn validate_export_prefix(prefix: String) -> Result<String, ConfigError> {
    if prefix.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "PHDIGEST_EXPORT_PREFIX".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(prefix)
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("credentials", &self.credentials)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("api_base_url", &self.api_base_url)
            .field("run", &self.run)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("export_prefix", &self.export_prefix)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}
