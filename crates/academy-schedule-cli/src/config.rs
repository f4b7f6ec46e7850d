//! Settings loaded from the environment, overridable by command-line flags.

use academy_schedule::WeekStart;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Clone, Debug)]
pub struct CliConfig {
    pub week_start: WeekStart,
    /// `EnvFilter` directives, e.g. `warn` or `academy_schedule=debug`.
    pub log_filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::default(),
            log_filter: "warn".to_string(),
        }
    }
}

impl CliConfig {
    /// Read `ACADEMY_WEEK_START` (`sunday` | `monday`) and `RUST_LOG` (filter
    /// directives). Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = var("ACADEMY_WEEK_START") {
            config.week_start = raw
                .parse()
                .map_err(|e: String| ConfigError::InvalidValue("ACADEMY_WEEK_START".to_string(), e))?;
        }

        if let Some(raw) = var("RUST_LOG") {
            EnvFilter::try_new(&raw)
                .map_err(|e| ConfigError::InvalidValue("RUST_LOG".to_string(), e.to_string()))?;
            config.log_filter = raw;
        }

        Ok(config)
    }
}
