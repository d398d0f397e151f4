//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Local image classification.
pub mod image;
/// Tracing setup.
pub mod logging;
/// Matrix client-server API client.
pub mod matrix;

pub use config::{AppConfig, ConfigStore, LogLevel};
pub use image::ImageClassifier;
pub use logging::init_logging;
pub use matrix::{MatrixClient, MatrixClientConfig};
