//! Local image handling.

pub mod classifier;

pub use classifier::{ImageClassifier, classify_bytes, corrected_mime_type};
