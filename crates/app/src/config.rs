//! Runtime configuration from the environment.

use std::path::PathBuf;

use credit_tracker_observability::LogFormat;
use credit_tracker_store::DEFAULT_STORE_KEY;

pub const DATA_DIR_ENV: &str = "CREDIT_TRACKER_DATA_DIR";
pub const STORE_KEY_ENV: &str = "CREDIT_TRACKER_STORE_KEY";
pub const LOG_FORMAT_ENV: &str = "CREDIT_TRACKER_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub store_key: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (tests pass a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let store_key = lookup(STORE_KEY_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORE_KEY.to_string());

        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                eprintln!("{err}; falling back to text logs");
                LogFormat::Text
            }),
            None => LogFormat::Text,
        };

        Self {
            data_dir,
            store_key,
            log_format,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("credit-tracker"))
        .unwrap_or_else(|| PathBuf::from(".credit-tracker"))
}
