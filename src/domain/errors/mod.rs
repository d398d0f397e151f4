//! Domain error types.

mod classify_error;
mod matrix_error;
mod workflow_error;

pub use classify_error::ClassifyError;
pub use matrix_error::MatrixError;
pub use workflow_error::{RedactError, UploadError};
