//! Image classification port definition.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::entities::ImageInfo;
use crate::domain::errors::ClassifyError;

/// Port for reading a local image and deriving its pack metadata.
#[async_trait]
pub trait ImageClassifierPort: Send + Sync {
    /// Reads and classifies the image at `path`.
    async fn classify(&self, path: &Path) -> Result<ImageInfo, ClassifyError>;
}
