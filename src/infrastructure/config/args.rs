use super::app_config::LogLevel;
use clap::{Args, Parser};
use std::path::PathBuf;

/// Environment variable read when `--auth` is not given.
pub const AUTH_TOKEN_ENV: &str = "SYNAPSE_AUTH_TOKEN";

/// Homeserver connection flags shared by both tools.
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Homeserver URL, such as https://example.com:8443.
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,

    /// Access token.
    #[arg(long, value_name = "TOKEN", env = AUTH_TOKEN_ENV, hide_env_values = true)]
    pub auth: Option<String>,

    /// Room ID, starting with '!'.
    #[arg(short, long, value_name = "ROOM_ID")]
    pub room: Option<String>,
}

/// Configuration file and logging flags shared by both tools.
#[derive(Debug, Clone, Default, Args)]
pub struct LoggingArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

/// Command line of `emoji-uploader`.
#[derive(Debug, Parser)]
#[command(
    name = "emoji-uploader",
    version,
    about = "Uploads a directory of images as a Matrix room emote pack",
    long_about = None
)]
pub struct UploaderArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Directory containing the emoji images.
    #[arg(short, long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Pack name.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Command line of `mass-delete`.
#[derive(Debug, Parser)]
#[command(
    name = "mass-delete",
    version,
    about = "Redacts every message in a Matrix room",
    long_about = None
)]
pub struct MassDeleteArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}
