//! Runtime configuration for the profile API.
//!
//! Values come from the environment; command-line callers override fields
//! after loading.

use profiledir_core::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "PROFILEDIR_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "PROFILEDIR_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "PROFILEDIR_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "profiledir.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// SQLite database file holding the profile collection.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// File logging is enabled only when set.
    pub log_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `PROFILEDIR_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: read(DB_PATH_ENV).map_or(defaults.db_path, PathBuf::from),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiConfig, DB_PATH_ENV, DEFAULT_DB_FILE_NAME, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn blank_or_missing_values_fall_back_to_defaults() {
        let env = HashMap::from([(DB_PATH_ENV, "   ".to_string())]);
        let config = ApiConfig::from_lookup(|key| env.get(key).cloned());

        assert!(config.db_path.ends_with(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.log_dir, None);
        assert!(!config.log_level.is_empty());
    }

    #[test]
    fn environment_values_are_trimmed_and_applied() {
        let env = HashMap::from([
            (DB_PATH_ENV, " /var/lib/profiles.db ".to_string()),
            (LOG_LEVEL_ENV, "warn".to_string()),
            (LOG_DIR_ENV, "/var/log/profiledir".to_string()),
        ]);
        let config = ApiConfig::from_lookup(|key| env.get(key).cloned());

        assert_eq!(config.db_path, PathBuf::from("/var/lib/profiles.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/profiledir")));
    }
}
