//! Trait definitions for generative backends.

use crate::{JobStatus, VideoJob, VideoJobRequest};
use async_trait::async_trait;
use overthink_core::{GenerateRequest, GenerateResponse, MediaPayload};
use overthink_error::OverthinkResult;

/// Core trait every generative backend implements.
///
/// Covers single-shot multimodal generation: text in, text and/or inline
/// images out.
#[async_trait]
pub trait GenerativeDriver: Send + Sync {
    /// Generate model output given a multimodal request.
    async fn generate(&self, req: &GenerateRequest) -> OverthinkResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier used when a request names none.
    fn model_name(&self) -> &str;
}

/// Backends that generate video through a long-running job.
///
/// Kept separate from [`GenerativeDriver`] so both can be held as trait
/// objects independently.
#[async_trait]
pub trait VideoGeneration: Send + Sync {
    /// Submit a generation job and return its handle.
    async fn submit_video(&self, req: &VideoJobRequest) -> OverthinkResult<VideoJob>;

    /// Check the status of a submitted job once.
    async fn poll_video(&self, job: &VideoJob) -> OverthinkResult<JobStatus>;

    /// Fetch finished media from the URI reported by the job.
    async fn download_video(&self, uri: &str) -> OverthinkResult<MediaPayload>;

    /// Video model identifier.
    fn video_model_name(&self) -> &str;
}
