//! Types for long-running video jobs.

use serde::{Deserialize, Serialize};

/// Frame aspect ratio for generated video.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum AspectRatio {
    /// Landscape
    #[default]
    #[serde(rename = "16:9")]
    #[strum(serialize = "16:9")]
    Landscape,
    /// Portrait
    #[serde(rename = "9:16")]
    #[strum(serialize = "9:16")]
    Portrait,
}

/// Parameters for one video generation job.
///
/// # Examples
///
/// ```
/// use overthink_interface::{AspectRatio, VideoJobRequest};
///
/// let req = VideoJobRequest::builder()
///     .prompt("A cat overthinks a cardboard box")
///     .build()
///     .unwrap();
///
/// assert_eq!(*req.duration_secs(), 5);
/// assert_eq!(*req.aspect_ratio(), AspectRatio::Landscape);
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder, derive_getters::Getters,
)]
#[builder(setter(into))]
pub struct VideoJobRequest {
    /// Text prompt describing the video
    prompt: String,
    /// Clip length in seconds
    #[builder(default = "5")]
    duration_secs: u32,
    /// Frame aspect ratio
    #[builder(default)]
    aspect_ratio: AspectRatio,
    /// Number of clips to generate
    #[builder(default = "1")]
    sample_count: u32,
}

impl VideoJobRequest {
    /// Creates a new request builder.
    pub fn builder() -> VideoJobRequestBuilder {
        VideoJobRequestBuilder::default()
    }
}

/// Handle of a submitted long-running job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct VideoJob {
    /// Provider operation name, e.g. `models/veo-2.0-generate-001/operations/abc`
    name: String,
}

impl VideoJob {
    /// Wrap an operation name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Outcome of one status check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Still running
    Running,
    /// Finished with a provider error
    Failed {
        /// Provider error code
        code: Option<i64>,
        /// Provider error message
        message: String,
    },
    /// Finished; the media URI may be missing if the job produced nothing
    Completed {
        /// Where to download the first generated clip
        video_uri: Option<String>,
    },
}
