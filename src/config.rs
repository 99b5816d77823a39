//! Module reading the runtime configuration from environment variables

use std::num::NonZeroUsize;

use crate::domain::IdWidth;
use crate::error::{ConfigError, invalid_value};
use crate::telemetry::LogFormat;

const VAR_LOG_FORMAT: &str = "LOG_FORMAT";
const VAR_ID_HEX_LEN: &str = "ID_HEX_LEN";
const VAR_WORKERS: &str = "INGEST_WORKERS";
const VAR_FAIL_FAST: &str = "INGEST_FAIL_FAST";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Output format of the logs (`LOG_FORMAT`)
    pub log_format: LogFormat,
    /// Identifier width in hex characters (`ID_HEX_LEN`)
    pub id_width: IdWidth,
    /// Files processed concurrently (`INGEST_WORKERS`), 1 means sequential
    pub workers: NonZeroUsize,
    /// Stop attempting further files once one could not be read (`INGEST_FAIL_FAST`)
    pub fail_fast: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            id_width: IdWidth::DEFAULT,
            workers: NonZeroUsize::MIN,
            fail_fast: false,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(VAR_LOG_FORMAT) {
            config.log_format = value
                .parse()
                .map_err(|reason: String| invalid_value(VAR_LOG_FORMAT, &value, reason))?;
        }

        if let Some(value) = lookup(VAR_ID_HEX_LEN) {
            config.id_width = value
                .trim()
                .parse()
                .ok()
                .and_then(IdWidth::new)
                .ok_or_else(|| invalid_value(VAR_ID_HEX_LEN, &value, "expected 1..=64"))?;
        }

        if let Some(value) = lookup(VAR_WORKERS) {
            config.workers = value
                .trim()
                .parse()
                .map_err(|_| invalid_value(VAR_WORKERS, &value, "expected a positive integer"))?;
        }

        if let Some(value) = lookup(VAR_FAIL_FAST) {
            config.fail_fast = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => return Err(invalid_value(VAR_FAIL_FAST, &value, "expected true or false")),
            };
        }

        Ok(config)
    }
}
