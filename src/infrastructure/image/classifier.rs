//! Image sniffing, animation detection and dimension probing.

use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, Frames, ImageFormat, ImageReader};
use tracing::{debug, trace};

use crate::domain::entities::{APNG_MIME_TYPE, ImageInfo};
use crate::domain::errors::ClassifyError;
use crate::domain::ports::ImageClassifierPort;

const PNG_MIME_TYPE: &str = "image/png";
const MOZILLA_APNG_MIME_TYPE: &str = "image/vnd.mozilla.apng";

/// Classifies images on the blocking thread pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageClassifier;

impl ImageClassifier {
    /// Creates a new classifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageClassifierPort for ImageClassifier {
    async fn classify(&self, path: &Path) -> Result<ImageInfo, ClassifyError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| ClassifyError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || classify_bytes(&path, Bytes::from(data)))
            .await
            .map_err(|e| ClassifyError::decode(format!("classification task failed: {e}")))?
    }
}

/// Classifies raw file contents read from `path`.
///
/// # Errors
/// Returns error if the bytes are not a supported image container or the
/// header cannot be decoded.
pub fn classify_bytes(path: &Path, bytes: Bytes) -> Result<ImageInfo, ClassifyError> {
    let format = image::guess_format(&bytes)?;
    let is_animated = detect_animation(format, &bytes)?;
    let mime_type = corrected_mime_type(format.to_mime_type(), is_animated);

    let (width, height) =
        ImageReader::with_format(Cursor::new(bytes.as_ref()), format).into_dimensions()?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    debug!(
        file = %name,
        mime_type = %mime_type,
        is_animated,
        width,
        height,
        "Classified image"
    );

    Ok(ImageInfo {
        path: path.to_path_buf(),
        name,
        mime_type,
        is_animated,
        width,
        height,
        bytes,
    })
}

/// Swaps the static PNG type for `image/apng` when the file is animated.
#[must_use]
pub fn corrected_mime_type(sniffed: &str, is_animated: bool) -> String {
    if is_animated && (sniffed == PNG_MIME_TYPE || sniffed == MOZILLA_APNG_MIME_TYPE) {
        APNG_MIME_TYPE.to_string()
    } else {
        sniffed.to_string()
    }
}

fn detect_animation(format: ImageFormat, bytes: &[u8]) -> Result<bool, ClassifyError> {
    let cursor = Cursor::new(bytes);
    match format {
        ImageFormat::Gif => has_multiple_frames(GifDecoder::new(cursor)?.into_frames()),
        ImageFormat::Png => {
            let decoder = PngDecoder::new(cursor)?;
            if !decoder.is_apng()? {
                return Ok(false);
            }
            has_multiple_frames(decoder.apng()?.into_frames())
        }
        ImageFormat::WebP => Ok(WebPDecoder::new(cursor)?.has_animation()),
        other => {
            trace!(format = ?other, "Format has no animation support");
            Ok(false)
        }
    }
}

fn has_multiple_frames(frames: Frames<'_>) -> Result<bool, ClassifyError> {
    let mut count = 0;
    for frame in frames.take(2) {
        frame?;
        count += 1;
    }
    Ok(count > 1)
}
