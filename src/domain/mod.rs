//! Domain layer with core entities, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Pack state key derivation.
pub mod pack_id;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;

pub use entities::{AccessToken, ClientEvent, ImageInfo, MessageResponse, Pack, RoomId};
pub use errors::{ClassifyError, MatrixError, RedactError, UploadError};
pub use pack_id::encode_pack_id;
pub use ports::{ImageClassifierPort, MatrixPort};
