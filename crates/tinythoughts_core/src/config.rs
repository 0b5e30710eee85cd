//! Runtime configuration for store location and logging.
//!
//! Resolution order, later layers winning:
//! 1. Platform defaults from the `directories` crate.
//! 2. An optional JSON file.
//! 3. `TINYTHOUGHTS_DB_PATH`, `TINYTHOUGHTS_LOG_DIR`, `TINYTHOUGHTS_LOG_LEVEL`.

use crate::logging::default_log_level;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "TINYTHOUGHTS_DB_PATH";
pub const ENV_LOG_DIR: &str = "TINYTHOUGHTS_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "TINYTHOUGHTS_LOG_LEVEL";

const DB_FILE_NAME: &str = "tinythoughts.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Settings shared by the CLI and embedding hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// SQLite store file.
    pub db_path: PathBuf,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let (data_dir, log_dir) = match ProjectDirs::from("app", "tinythoughts", "TinyThoughts") {
            Some(dirs) => (dirs.data_dir().to_path_buf(), dirs.data_local_dir().join("logs")),
            None => {
                let base = std::env::temp_dir().join("tinythoughts");
                (base.clone(), base.join("logs"))
            }
        };
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_dir,
            log_level: default_log_level().to_string(),
        }
    }
}

impl CoreConfig {
    /// Loads defaults, overlays `path` when given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Reads a JSON file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies variables resolved by `lookup`; blank values are ignored.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(value) = lookup(ENV_DB_PATH) {
            self.db_path = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_LOG_DIR) {
            self.log_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.log_level = value;
        }
        self
    }
}
