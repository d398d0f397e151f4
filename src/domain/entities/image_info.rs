//! Classified local image file.

use std::path::PathBuf;

use bytes::Bytes;

use super::pack::{PackImage, PackImageInfo, PackUsage};

/// MIME type reported for animated PNG files.
pub const APNG_MIME_TYPE: &str = "image/apng";

/// A local image read from disk and classified, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Full path on disk.
    pub path: PathBuf,
    /// Base file name including extension.
    pub name: String,
    /// Sniffed MIME type.
    pub mime_type: String,
    /// Whether the file holds more than one frame.
    pub is_animated: bool,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Raw file contents.
    pub bytes: Bytes,
}

impl ImageInfo {
    /// Returns the emote short name: the base name without its extension.
    ///
    /// Everything from the last `.` is the extension, so a dotfile such as
    /// `.png` has an empty name.
    #[must_use]
    pub fn emote_name(&self) -> &str {
        self.name
            .rfind('.')
            .map_or(self.name.as_str(), |dot| &self.name[..dot])
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Returns the usage this image gets in a pack.
    #[must_use]
    pub const fn usage(&self) -> PackUsage {
        PackUsage::for_dimensions(self.width, self.height)
    }

    /// Builds the pack entry for this image once uploaded to `content_url`.
    #[must_use]
    pub fn to_pack_image(&self, content_url: impl Into<String>) -> PackImage {
        let info = PackImageInfo {
            mimetype: self.mime_type.clone(),
            size: Some(self.size()),
            width: Some(u64::from(self.width)),
            height: Some(u64::from(self.height)),
        };
        PackImage::new(content_url, info, self.usage())
    }
}
