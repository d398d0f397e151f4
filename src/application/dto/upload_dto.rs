//! Pack upload DTOs.

use std::path::PathBuf;

use crate::domain::entities::{Pack, RoomId};

/// Input of a pack upload run.
#[derive(Debug, Clone)]
pub struct UploadPackRequest {
    /// Room holding the pack.
    pub room_id: RoomId,
    /// Human-readable pack name; also the source of the state key.
    pub pack_name: String,
    /// Directory scanned for images.
    pub root: PathBuf,
}

impl UploadPackRequest {
    /// Creates new upload request.
    #[must_use]
    pub fn new(room_id: RoomId, pack_name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            room_id,
            pack_name: pack_name.into(),
            root: root.into(),
        }
    }
}

/// A file that could not be classified and was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// Path of the file.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

/// Result of a pack upload run.
#[derive(Debug, Clone)]
pub struct UploadPackResponse {
    /// State key the pack was stored under.
    pub pack_id: String,
    /// The pack as stored.
    pub pack: Pack,
    /// Emote names uploaded in this run.
    pub uploaded: Vec<String>,
    /// Emote names already in the pack.
    pub existing: Vec<String>,
    /// Files that failed classification.
    pub failed: Vec<SkippedFile>,
    /// Whether this run set the pack avatar.
    pub avatar_updated: bool,
}

impl UploadPackResponse {
    /// Returns number of media uploads performed, avatar included.
    #[must_use]
    pub fn upload_count(&self) -> usize {
        self.uploaded.len() + usize::from(self.avatar_updated)
    }
}
