//! Self-describing media payloads (`data:<mime>;base64,<payload>`).

use base64::{Engine as _, engine::general_purpose::STANDARD};
use overthink_error::{MediaError, MediaErrorKind};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// A MIME type plus base64 payload.
///
/// The wire form is exactly `data:<mime-type>;base64,<payload>` and is
/// preserved byte for byte through parse and display.
///
/// # Examples
///
/// ```
/// use overthink_core::MediaPayload;
///
/// let payload: MediaPayload = "data:image/png;base64,iVBORw0KGgo=".parse().unwrap();
/// assert_eq!(payload.mime(), "image/png");
/// assert_eq!(payload.to_string(), "data:image/png;base64,iVBORw0KGgo=");
///
/// assert!("image/png;base64,AAAA".parse::<MediaPayload>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(try_from = "String", into = "String")]
#[display("{}{}{}{}", SCHEME, mime, BASE64_MARKER, data)]
pub struct MediaPayload {
    mime: String,
    data: String,
}

impl MediaPayload {
    /// Encode raw bytes under the given MIME type.
    pub fn from_bytes(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime: mime.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// MIME type, e.g. `video/mp4`.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Base64 text of the payload.
    pub fn base64(&self) -> &str {
        &self.data
    }

    /// Decode the payload to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, MediaError> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| MediaError::new(MediaErrorKind::Base64Decode(e.to_string())))
    }

    /// Size of the decoded payload in bytes, computed from the base64 length.
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|b| *b == b'=').count();
        (self.data.len() / 4) * 3 - padding.min(2)
    }
}

impl FromStr for MediaPayload {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(SCHEME)
            .ok_or_else(|| MediaError::new(MediaErrorKind::MissingScheme))?;
        let (mime, data) = rest
            .split_once(BASE64_MARKER)
            .ok_or_else(|| MediaError::new(MediaErrorKind::NotBase64))?;

        if mime.trim().is_empty() {
            return Err(MediaError::new(MediaErrorKind::EmptyMime));
        }
        if data.is_empty() {
            return Err(MediaError::new(MediaErrorKind::EmptyPayload));
        }
        STANDARD
            .decode(data)
            .map_err(|e| MediaError::new(MediaErrorKind::Base64Decode(e.to_string())))?;

        Ok(Self {
            mime: mime.to_string(),
            data: data.to_string(),
        })
    }
}

impl TryFrom<String> for MediaPayload {
    type Error = MediaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MediaPayload> for String {
    fn from(payload: MediaPayload) -> Self {
        payload.to_string()
    }
}

/// A user-supplied video: a [`MediaPayload`] whose MIME type is `video/*`.
///
/// # Examples
///
/// ```
/// use overthink_core::VideoAsset;
///
/// let video = VideoAsset::parse("data:video/mp4;base64,AAAA").unwrap();
/// assert_eq!(video.mime(), "video/mp4");
///
/// assert!(VideoAsset::parse("data:image/png;base64,AAAA").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(try_from = "String", into = "String")]
pub struct VideoAsset(MediaPayload);

impl VideoAsset {
    /// Parse a data URI and require a video MIME type.
    pub fn parse(s: &str) -> Result<Self, MediaError> {
        Self::try_from(s.parse::<MediaPayload>()?)
    }

    /// Wrap raw bytes as a video. Empty input is rejected so the result
    /// always parses back from its data URI.
    pub fn from_bytes(mime: impl Into<String>, bytes: &[u8]) -> Result<Self, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::new(MediaErrorKind::EmptyPayload));
        }
        Self::try_from(MediaPayload::from_bytes(mime, bytes))
    }

    /// MIME type, e.g. `video/webm`.
    pub fn mime(&self) -> &str {
        self.0.mime()
    }

    /// Underlying payload.
    pub fn payload(&self) -> &MediaPayload {
        &self.0
    }

    /// Size of the decoded video in bytes.
    pub fn decoded_len(&self) -> usize {
        self.0.decoded_len()
    }
}

impl TryFrom<MediaPayload> for VideoAsset {
    type Error = MediaError;

    fn try_from(payload: MediaPayload) -> Result<Self, Self::Error> {
        if payload.mime().starts_with("video/") {
            Ok(Self(payload))
        } else {
            Err(MediaError::new(MediaErrorKind::UnexpectedMime {
                expected: "video",
                actual: payload.mime().to_string(),
            }))
        }
    }
}

impl TryFrom<String> for VideoAsset {
    type Error = MediaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VideoAsset> for String {
    fn from(video: VideoAsset) -> Self {
        video.0.into()
    }
}

/// Kind of generated media.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    /// Still image
    #[display("image")]
    Image,
    /// Short video clip
    #[display("video")]
    Video,
}

/// Media produced by the image or video flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct GeneratedMedia {
    /// Image or video
    kind: MediaKind,
    /// Encoded media
    payload: MediaPayload,
}

impl GeneratedMedia {
    /// Wrap a generated image.
    pub fn image(payload: MediaPayload) -> Self {
        Self {
            kind: MediaKind::Image,
            payload,
        }
    }

    /// Wrap a generated video.
    pub fn video(payload: MediaPayload) -> Self {
        Self {
            kind: MediaKind::Video,
            payload,
        }
    }

    /// Data URI of the media.
    pub fn data_uri(&self) -> String {
        self.payload.to_string()
    }
}
