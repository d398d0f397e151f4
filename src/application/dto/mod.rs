//! Data transfer objects for the application layer.

mod redact_dto;
mod upload_dto;

pub use redact_dto::RedactReport;
pub use upload_dto::{SkippedFile, UploadPackRequest, UploadPackResponse};
