//! Image classification error types.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or decoding a local image.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ClassifyError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognized image format")]
    UnsupportedFormat,

    #[error("failed to decode image: {message}")]
    Decode { message: String },
}

impl ClassifyError {
    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

impl From<image::ImageError> for ClassifyError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Unsupported(_) => Self::UnsupportedFormat,
            other => Self::decode(other.to_string()),
        }
    }
}
