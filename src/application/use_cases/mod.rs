//! Use case implementations.

mod mass_redact_use_case;
mod upload_pack_use_case;

pub use mass_redact_use_case::MassRedactUseCase;
pub use upload_pack_use_case::{LOGO_FILE_NAME, UploadPackUseCase};
