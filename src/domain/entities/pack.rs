//! Emote pack document stored in `im.ponies.room_emotes` room state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::serde_utils::{lenient_u64, null_as_default};

/// Images wider or taller than this are registered as stickers.
pub const STICKER_THRESHOLD_PX: u32 = 128;

/// Intended use of a pack or a single image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackUsage {
    /// Inline emoji.
    Emoticon,
    /// Standalone sticker.
    Sticker,
}

impl PackUsage {
    /// Picks the usage for an image of the given size.
    #[must_use]
    pub const fn for_dimensions(width: u32, height: u32) -> Self {
        if width > STICKER_THRESHOLD_PX || height > STICKER_THRESHOLD_PX {
            Self::Sticker
        } else {
            Self::Emoticon
        }
    }

    /// Returns the wire tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Emoticon => "emoticon",
            Self::Sticker => "sticker",
        }
    }
}

impl std::fmt::Display for PackUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A room emote pack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pack {
    /// Images keyed by short name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: HashMap<String, PackImage>,
    /// Pack metadata.
    #[serde(default, deserialize_with = "null_as_default")]
    pub pack: PackInfo,
}

impl Pack {
    /// Returns whether an image with this short name exists.
    #[must_use]
    pub fn contains_image(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    /// Returns whether the pack already has an avatar.
    #[must_use]
    pub const fn has_avatar(&self) -> bool {
        self.pack.avatar_url.is_some()
    }
}

/// Pack-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackInfo {
    /// Name shown in clients.
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    /// `mxc://` URL of the pack avatar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Credit line for the artwork.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    /// Usage tags applying to the whole pack.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub usage: Vec<String>,
}

/// A single pack image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackImage {
    /// `mxc://` content URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    /// Media metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<PackImageInfo>,
    /// Usage tags, `["emoticon"]` or `["sticker"]`.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub usage: Vec<String>,
}

impl PackImage {
    /// Creates an image entry with a single usage tag.
    #[must_use]
    pub fn new(url: impl Into<String>, info: PackImageInfo, usage: PackUsage) -> Self {
        Self {
            url: url.into(),
            info: Some(info),
            usage: vec![usage.as_str().to_string()],
        }
    }
}

/// Media metadata for a pack image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackImageInfo {
    /// MIME type of the uploaded file.
    #[serde(default, deserialize_with = "null_as_default")]
    pub mimetype: String,
    /// File size in bytes.
    #[serde(default, with = "lenient_u64", skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Width in pixels.
    #[serde(rename = "w", default, with = "lenient_u64", skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
    /// Height in pixels.
    #[serde(rename = "h", default, with = "lenient_u64", skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
}
