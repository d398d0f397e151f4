//! Matrix room tools: an emoji/sticker pack uploader and a mass message redactor.
//!
//! The crate follows a layered layout. `domain` holds the pack and event
//! models and the [`domain::ports::MatrixPort`] capability, `application`
//! the two workflows, and `infrastructure` the HTTP client, image
//! classification and command line configuration.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the tools.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
