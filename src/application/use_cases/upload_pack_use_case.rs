//! Emote pack upload use case.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::application::dto::{SkippedFile, UploadPackRequest, UploadPackResponse};
use crate::application::services::find_images;
use crate::domain::entities::{ImageInfo, Pack};
use crate::domain::errors::UploadError;
use crate::domain::ports::{ImageClassifierPort, MatrixPort};

/// File that becomes the pack avatar when found at the top of the scanned directory.
pub const LOGO_FILE_NAME: &str = "logo.png";

/// Uploads a directory of images into a room emote pack.
#[derive(Clone)]
pub struct UploadPackUseCase {
    matrix: Arc<dyn MatrixPort>,
    classifier: Arc<dyn ImageClassifierPort>,
}

impl UploadPackUseCase {
    /// Creates new upload use case.
    #[must_use]
    pub const fn new(
        matrix: Arc<dyn MatrixPort>,
        classifier: Arc<dyn ImageClassifierPort>,
    ) -> Self {
        Self { matrix, classifier }
    }

    /// Uploads every image not yet in the pack and stores the merged pack.
    ///
    /// Images that cannot be classified are logged and skipped. Media already
    /// uploaded stays on the server if a later step fails.
    ///
    /// # Errors
    /// Returns error if the pack cannot be fetched or stored, the directory
    /// cannot be read, or an upload fails.
    pub async fn execute(
        &self,
        request: UploadPackRequest,
    ) -> Result<UploadPackResponse, UploadError> {
        let room_id = request.room_id.as_str();
        let pack_id = self.matrix.encode_pack_id(&request.pack_name);

        debug!(room_id, pack_id = %pack_id, "Fetching existing emote pack");

        let mut pack = self
            .matrix
            .get_emote_pack(room_id, &pack_id)
            .await
            .map_err(|source| UploadError::FetchPack {
                pack_id: pack_id.clone(),
                source,
            })?;

        info!(
            pack_id = %pack_id,
            existing = pack.images.len(),
            "Loaded emote pack"
        );

        let files = find_images(&request.root).map_err(|source| UploadError::ScanDirectory {
            path: request.root.clone(),
            source,
        })?;

        debug!(count = files.len(), "Found image files");

        let mut response = UploadPackResponse {
            pack_id: pack_id.clone(),
            pack: Pack::default(),
            uploaded: Vec::new(),
            existing: Vec::new(),
            failed: Vec::new(),
            avatar_updated: false,
        };

        for path in files {
            let image = match self.classifier.classify(&path).await {
                Ok(image) => image,
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Skipping unreadable image");
                    response.failed.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let relative = path.strip_prefix(&request.root).unwrap_or(&path);

            if relative == Path::new(LOGO_FILE_NAME) && !pack.has_avatar() {
                let content_url = self.upload(&image, relative).await?;
                pack.pack.avatar_url = Some(content_url);
                response.avatar_updated = true;
                continue;
            }

            let name = image.emote_name().to_string();
            if pack.contains_image(&name) {
                debug!(name = %name, "Emote already in pack, not uploading");
                response.existing.push(name);
                continue;
            }

            let content_url = self.upload(&image, relative).await?;
            pack.images.insert(name.clone(), image.to_pack_image(content_url));
            response.uploaded.push(name);
        }

        pack.pack.display_name.clone_from(&request.pack_name);

        debug!(pack_id = %pack_id, images = pack.images.len(), "Storing emote pack");

        response.pack = self
            .matrix
            .put_emote_pack(room_id, &pack_id, pack)
            .await
            .map_err(|source| UploadError::StorePack {
                pack_id: pack_id.clone(),
                source,
            })?;

        info!(
            pack_id = %pack_id,
            uploaded = response.uploaded.len(),
            existing = response.existing.len(),
            failed = response.failed.len(),
            avatar_updated = response.avatar_updated,
            "Emote pack updated"
        );

        Ok(response)
    }

    async fn upload(&self, image: &ImageInfo, relative: &Path) -> Result<String, UploadError> {
        info!("Uploading {}...", relative.display());

        self.matrix
            .upload_file(&image.name, &image.mime_type, image.bytes.clone())
            .await
            .map_err(|source| {
                error!(file = %relative.display(), error = %source, "Upload failed");
                UploadError::Upload {
                    file: relative.display().to_string(),
                    source,
                }
            })
    }
}
