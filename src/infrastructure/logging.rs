//! Tracing subscriber setup shared by the binaries.

use std::fs::{self, OpenOptions};
use std::io;

use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use super::config::AppConfig;

/// Installs the global subscriber: stderr always, plus a file when configured.
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Errors
/// Returns error if the log file cannot be opened.
pub fn init_logging(config: &AppConfig) -> io::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.log_level.to_tracing_level()).into())
        .from_env_lossy();

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time();

    let file_layer = match &config.log_path {
        Some(log_path) => {
            if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }

            let file = OpenOptions::new().create(true).append(true).open(log_path)?;

            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(false)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(log_path) = &config.log_path {
        info!(path = %log_path.display(), "Logging initialized");
    }

    Ok(())
}
