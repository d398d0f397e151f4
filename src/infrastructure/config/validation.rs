//! Checks command line input before any request is made.

use std::fmt;
use std::path::PathBuf;

use reqwest::Url;
use thiserror::Error;

use super::app_config::AppConfig;
use super::args::{AUTH_TOKEN_ENV, ConnectionArgs, UploaderArgs};
use crate::domain::entities::{AccessToken, RoomId};

const SHELL_ESCAPE_HINT: &str =
    "\n\tDid you escape the '!' properly? Many shells are very picky about the '!' character";

/// A single rejected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum ValidationError {
    #[error("Homeserver URL is required")]
    MissingServer,

    #[error("Not a valid homeserver URL\n\tMust be a full URL such as https://example.com:8443")]
    InvalidServer { value: String },

    #[error(
        "Auth token required. Please pass the --auth parameter or set the {} environment variable",
        AUTH_TOKEN_ENV
    )]
    MissingToken,

    #[error("Room ID is required")]
    MissingRoom,

    #[error("Invalid room ID: {value}{hint}", hint = escape_hint(.value))]
    InvalidRoom { value: String },

    #[error("Pack name is required")]
    MissingPackName,

    #[error("Path to emoji is required")]
    MissingPath,

    #[error("Invalid path: {}", path.display())]
    InvalidPath { path: PathBuf },
}

fn escape_hint(room: &str) -> &'static str {
    if room.starts_with('\\') {
        SHELL_ESCAPE_HINT
    } else {
        ""
    }
}

/// Every input check that failed, in the order they were made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Returns the individual failures.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Returns whether the given failure was recorded.
    #[must_use]
    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    fn into_result<T>(self, value: Option<T>) -> Result<T, Self> {
        match value {
            Some(value) if self.0.is_empty() => Ok(value),
            _ => Err(self),
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validated homeserver connection.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Homeserver base URL.
    pub server: Url,
    /// Access token.
    pub token: AccessToken,
    /// Target room.
    pub room_id: RoomId,
}

/// Validated `emoji-uploader` input.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    /// Homeserver connection.
    pub connection: Connection,
    /// Pack name.
    pub pack_name: String,
    /// Directory of images.
    pub path: PathBuf,
}

/// Validates `mass-delete` input.
///
/// # Errors
/// Returns every failed check.
pub fn validate_connection(
    config: &AppConfig,
    args: &ConnectionArgs,
) -> Result<Connection, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let connection = check_connection(config, args, &mut errors);
    errors.into_result(connection)
}

/// Validates `emoji-uploader` input.
///
/// # Errors
/// Returns every failed check.
pub fn validate_uploader(
    config: &AppConfig,
    args: &UploaderArgs,
) -> Result<UploadSettings, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let connection = check_connection(config, &args.connection, &mut errors);

    let pack_name = match args.name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => Some(name.to_string()),
        None => {
            errors.push(ValidationError::MissingPackName);
            None
        }
    };

    let path = match args.path.as_deref().filter(|p| !p.as_os_str().is_empty()) {
        Some(path) if path.is_dir() => Some(path.to_path_buf()),
        Some(path) => {
            errors.push(ValidationError::InvalidPath {
                path: path.to_path_buf(),
            });
            None
        }
        None => {
            errors.push(ValidationError::MissingPath);
            None
        }
    };

    let settings = match (connection, pack_name, path) {
        (Some(connection), Some(pack_name), Some(path)) => Some(UploadSettings {
            connection,
            pack_name,
            path,
        }),
        _ => None,
    };
    errors.into_result(settings)
}

fn check_connection(
    config: &AppConfig,
    args: &ConnectionArgs,
    errors: &mut ValidationErrors,
) -> Option<Connection> {
    let server = match config.server.as_deref().filter(|s| !s.is_empty()) {
        Some(value) => parse_server(value).or_else(|| {
            errors.push(ValidationError::InvalidServer {
                value: value.to_string(),
            });
            None
        }),
        None => {
            errors.push(ValidationError::MissingServer);
            None
        }
    };

    let token = args.auth.as_deref().and_then(AccessToken::new);
    if token.is_none() {
        errors.push(ValidationError::MissingToken);
    }

    let room_id = match args.room.as_deref().filter(|r| !r.is_empty()) {
        Some(value) => RoomId::new(value).or_else(|| {
            errors.push(ValidationError::InvalidRoom {
                value: value.to_string(),
            });
            None
        }),
        None => {
            errors.push(ValidationError::MissingRoom);
            None
        }
    };

    Some(Connection {
        server: server?,
        token: token?,
        room_id: room_id?,
    })
}

fn parse_server(value: &str) -> Option<Url> {
    let url = Url::parse(value).ok()?;
    let supported = matches!(url.scheme(), "http" | "https") && url.has_host();
    supported.then_some(url)
}
