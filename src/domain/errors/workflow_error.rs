//! Errors that end an uploader or mass-delete run.

use std::path::PathBuf;

use thiserror::Error;

use super::MatrixError;

/// Fatal failures of the pack upload workflow.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum UploadError {
    #[error("error fetching emote pack {pack_id}: {source}")]
    FetchPack {
        pack_id: String,
        #[source]
        source: MatrixError,
    },

    #[error("error scanning {}: {source}", path.display())]
    ScanDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error uploading {file}: {source}")]
    Upload {
        file: String,
        #[source]
        source: MatrixError,
    },

    #[error("error uploading emote pack {pack_id}: {source}")]
    StorePack {
        pack_id: String,
        #[source]
        source: MatrixError,
    },
}

/// Fatal failures of the mass redaction workflow.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum RedactError {
    #[error("error fetching messages: {0}")]
    FetchEvents(#[source] MatrixError),

    #[error("error redacting {event_id}: {source}")]
    Redact {
        event_id: String,
        #[source]
        source: MatrixError,
    },
}

impl RedactError {
    /// Returns the underlying API error.
    #[must_use]
    pub const fn matrix_error(&self) -> &MatrixError {
        match self {
            Self::FetchEvents(source) | Self::Redact { source, .. } => source,
        }
    }
}
