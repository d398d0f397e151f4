//! Application services.

mod image_finder;
mod txn_id;

pub use image_finder::{IMAGE_EXTENSIONS, find_images};
pub use txn_id::TxnIdGenerator;
