//! Input types for generation requests.

use crate::{MediaPayload, VideoAsset};
use serde::{Deserialize, Serialize};

/// Where media content is sourced from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaSource {
    /// URL to fetch the content from
    Url(String),
    /// Base64-encoded content
    Base64(String),
    /// Raw binary data
    Binary(Vec<u8>),
}

/// Supported input types to generative models.
///
/// # Examples
///
/// ```
/// use overthink_core::{Input, VideoAsset};
///
/// let text = Input::Text("Describe the video".to_string());
///
/// let video = VideoAsset::parse("data:video/mp4;base64,AAAA").unwrap();
/// let input = Input::from(&video);
/// assert!(matches!(input, Input::Video { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Input {
    /// Plain text input.
    Text(String),

    /// Image input (PNG, JPEG, WebP, etc.).
    Image {
        /// MIME type, e.g., "image/png"
        mime: Option<String>,
        /// Media source
        source: MediaSource,
    },

    /// Video input (MP4, WebM, etc.).
    Video {
        /// MIME type, e.g., "video/mp4"
        mime: Option<String>,
        /// Media source
        source: MediaSource,
    },
}

impl From<&VideoAsset> for Input {
    fn from(video: &VideoAsset) -> Self {
        Input::Video {
            mime: Some(video.mime().to_string()),
            source: MediaSource::Base64(video.payload().base64().to_string()),
        }
    }
}

impl From<&MediaPayload> for Input {
    fn from(payload: &MediaPayload) -> Self {
        let mime = Some(payload.mime().to_string());
        let source = MediaSource::Base64(payload.base64().to_string());
        if payload.mime().starts_with("video/") {
            Input::Video { mime, source }
        } else {
            Input::Image { mime, source }
        }
    }
}
