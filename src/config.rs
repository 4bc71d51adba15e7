//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the libSQL file backing the record store.
    pub db_path: PathBuf,
    /// How long the processing screen waits before redirecting to the profile.
    pub processing_delay: Duration,
    /// Lower bound of the simulated chat reply delay.
    pub reply_delay_min: Duration,
    /// Upper bound of the simulated chat reply delay.
    pub reply_delay_max: Duration,
    /// File name used when exporting the user's records.
    pub export_file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/neuromatch.db"),
            processing_delay: Duration::from_millis(4000),
            reply_delay_min: Duration::from_millis(1000),
            reply_delay_max: Duration::from_millis(3000),
            export_file_name: "neuromatch-data.json".to_string(),
        }
    }
}

impl AppConfig {
    /// Build a config from `NEUROMATCH_*` environment variables.
    ///
    /// Unset variables keep their defaults; malformed ones are rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (env-free for tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let db_path = lookup("NEUROMATCH_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let processing_delay = parse_millis(&lookup, "NEUROMATCH_PROCESSING_DELAY_MS")?
            .unwrap_or(defaults.processing_delay);
        let reply_delay_min = parse_millis(&lookup, "NEUROMATCH_REPLY_DELAY_MIN_MS")?
            .unwrap_or(defaults.reply_delay_min);
        let reply_delay_max = parse_millis(&lookup, "NEUROMATCH_REPLY_DELAY_MAX_MS")?
            .unwrap_or(defaults.reply_delay_max);

        if reply_delay_min > reply_delay_max {
            return Err(ConfigError::InvalidValue {
                key: "NEUROMATCH_REPLY_DELAY_MIN_MS".to_string(),
                message: format!(
                    "minimum ({}ms) exceeds maximum ({}ms)",
                    reply_delay_min.as_millis(),
                    reply_delay_max.as_millis()
                ),
            });
        }

        let export_file_name = lookup("NEUROMATCH_EXPORT_FILE")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.export_file_name);

        Ok(Self {
            db_path,
            processing_delay,
            reply_delay_min,
            reply_delay_max,
            export_file_name,
        })
    }
}

fn parse_millis<F>(lookup: &F, key: &str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{raw:?} is not a millisecond count: {e}"),
            }),
    }
}
