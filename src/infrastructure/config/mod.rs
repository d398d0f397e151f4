//! Application configuration.

pub mod app_config;
pub mod args;
pub mod storage;
pub mod validation;

pub use app_config::{AppConfig, LogLevel};
pub use args::{AUTH_TOKEN_ENV, ConnectionArgs, LoggingArgs, MassDeleteArgs, UploaderArgs};
pub use storage::{ConfigError, ConfigStore};
pub use validation::{
    Connection, UploadSettings, ValidationError, ValidationErrors, validate_connection,
    validate_uploader,
};
