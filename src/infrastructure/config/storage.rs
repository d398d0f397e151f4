use super::app_config::AppConfig;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Failure to read a config file.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    /// Returns whether the file was read but is not valid config.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

/// Loads [`AppConfig`] from disk.
pub struct ConfigStore {
    default_path: Option<PathBuf>,
}

impl ConfigStore {
    /// Creates a store reading from the platform config directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_path: AppConfig::default_config_path(),
        }
    }

    /// Creates a store with a specific default file (useful for testing).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            default_path: Some(path),
        }
    }

    /// Loads the configuration, falling back to defaults when the file does not parse.
    ///
    /// The parse failure is handed back so the caller can report it once
    /// logging is set up.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an explicit file is missing or a file cannot be read.
    pub fn load_or_default(
        &self,
        path_override: Option<&Path>,
    ) -> Result<(AppConfig, Option<ConfigError>), ConfigError> {
        match self.load_config(path_override) {
            Ok(config) => Ok((config, None)),
            Err(e) if e.is_parse_error() => Ok((AppConfig::default(), Some(e))),
            Err(e) => Err(e),
        }
    }

    /// Loads the application configuration.
    ///
    /// A missing default file yields defaults. A missing `path_override` is
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an explicit file is missing, a file cannot be
    /// read, or its contents are not valid config.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let Some(config_path) = path_override
            .map(Path::to_path_buf)
            .or_else(|| self.default_path.clone())
        else {
            debug!("No config directory available, using defaults");
            return Ok(AppConfig::default());
        };

        let content = match fs::read_to_string(&config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if path_override.is_some() {
                    return Err(ConfigError::NotFound { path: config_path });
                }
                debug!(path = %config_path.display(), "Config file not found, using defaults");
                return Ok(AppConfig::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: config_path,
                    source,
                });
            }
        };

        let mut config =
            toml::from_str::<AppConfig>(&content).map_err(|source| ConfigError::Parse {
                path: config_path.clone(),
                source,
            })?;
        config.config = Some(config_path);
        Ok(config)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}
