//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::{ConnectionArgs, LoggingArgs};

const APP_NAME: &str = "matrix-tools";
const APP_QUALIFIER: &str = "org";
const APP_ORGANIZATION: &str = "matrix-tools";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Settings read from the config file, overridden by command line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Default homeserver URL.
    #[serde(default)]
    pub server: Option<String>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path. Logs only go to stderr when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, connection: &ConnectionArgs, logging: &LoggingArgs) {
        if let Some(config_path) = &logging.config {
            self.config = Some(config_path.clone());
        }
        if let Some(server) = connection.server.as_ref().filter(|s| !s.is_empty()) {
            self.server = Some(server.clone());
        }
        if let Some(log_path) = &logging.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = logging.log_level {
            self.log_level = log_level;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }
}
