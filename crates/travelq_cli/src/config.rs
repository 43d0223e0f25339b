//! Runtime configuration from environment variables.
//!
//! # Responsibility
//! - Resolve database, import source and logging locations.
//! - Fall back to working-directory defaults when variables are unset.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use travelq_core::{default_log_level, LogLevel, LoggingError};

pub const DB_PATH_VAR: &str = "TRAVELQ_DB_PATH";
pub const CSV_PATH_VAR: &str = "TRAVELQ_CSV_PATH";
pub const LOG_LEVEL_VAR: &str = "TRAVELQ_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "TRAVELQ_LOG_DIR";

const DEFAULT_DB_FILE: &str = "travel_expenses.db";
const DEFAULT_CSV_FILE: &str = "travelq.csv";
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    CurrentDir(std::io::Error),
    LogLevel(LoggingError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CurrentDir(err) => write!(f, "cannot resolve working directory: {err}"),
            Self::LogLevel(err) => write!(f, "{LOG_LEVEL_VAR}: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
            Self::LogLevel(err) => Some(err),
        }
    }
}

/// Resolved startup settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// CSV imported once at startup.
    pub csv_path: PathBuf,
    pub log_level: LogLevel,
    /// Always absolute.
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        Self::from_lookup(|key| std::env::var(key).ok(), &cwd)
    }

    /// Builds settings from an arbitrary variable lookup; blank values count
    /// as unset. Relative log directories are resolved against `cwd`.
    pub fn from_lookup<F>(lookup: F, cwd: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let log_level = match var(LOG_LEVEL_VAR) {
            Some(value) => value.parse().map_err(ConfigError::LogLevel)?,
            None => default_log_level(),
        };

        let log_dir = var(LOG_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));
        let log_dir = if log_dir.is_absolute() {
            log_dir
        } else {
            cwd.join(log_dir)
        };

        Ok(Self {
            db_path: var(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE)),
            csv_path: var(CSV_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_FILE)),
            log_level,
            log_dir,
        })
    }
}
