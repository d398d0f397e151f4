use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::entities::{PackImage, PackInfo};

/// Reply from the media upload endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct UploadResponse {
    /// `mxc://` URL of the stored media.
    pub content_uri: Option<String>,
    /// Matrix error code.
    pub errcode: Option<String>,
    /// Human-readable error.
    pub error: Option<String>,
    /// Back-off requested with `M_LIMIT_EXCEEDED`.
    pub retry_after_ms: Option<u64>,
}

/// Standard Matrix error body.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    /// Matrix error code such as `M_FORBIDDEN`.
    #[serde(default)]
    pub errcode: String,
    /// Human-readable error.
    #[serde(default)]
    pub error: String,
}

/// The parts of a pack the server may echo back after a state PUT.
#[derive(Debug, Default, Deserialize)]
pub struct PackEcho {
    /// Echoed images, merged over the local map.
    pub images: Option<HashMap<String, PackImage>>,
    /// Echoed pack info, replaces the local one.
    pub pack: Option<PackInfo>,
}
