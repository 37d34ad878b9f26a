//! Veo video generation through long-running operations.

use super::GeminiResult;
use super::client::GeminiClient;
use super::protocol::{Operation, PredictLongRunningRequest, VideoInstance, VideoParameters};
use async_trait::async_trait;
use overthink_core::MediaPayload;
use overthink_error::{GeminiError, GeminiErrorKind, OverthinkResult};
use overthink_interface::{JobStatus, VideoGeneration, VideoJob, VideoJobRequest};
use tracing::{debug, info, instrument};

const DEFAULT_VIDEO_MIME: &str = "video/mp4";

impl GeminiClient {
    #[instrument(name = "gemini_submit_video", skip(self, req), fields(model = %self.video_model))]
    async fn submit_video_internal(&self, req: &VideoJobRequest) -> GeminiResult<VideoJob> {
        let body = PredictLongRunningRequest {
            instances: vec![VideoInstance {
                prompt: req.prompt().clone(),
            }],
            parameters: VideoParameters {
                aspect_ratio: req.aspect_ratio().to_string(),
                sample_count: *req.sample_count(),
                duration_seconds: *req.duration_secs(),
            },
        };

        let limiter = self.limiter_for(&self.video_model).await;
        let _guard = limiter.acquire().await;

        let operation: Operation = self
            .post_model(&self.video_model, "predictLongRunning", &body)
            .await?;

        if operation.name.trim().is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::InvalidOperation(
                "submit response carried no operation name".to_string(),
            )));
        }

        info!(operation = %operation.name, "Video job submitted");
        Ok(VideoJob::new(operation.name))
    }

    #[instrument(name = "gemini_poll_video", skip(self), fields(operation = %job.name()))]
    async fn poll_video_internal(&self, job: &VideoJob) -> GeminiResult<JobStatus> {
        let name = job.name().trim_start_matches('/');
        if name.is_empty() || name.contains("..") {
            return Err(GeminiError::new(GeminiErrorKind::InvalidOperation(
                job.name().clone(),
            )));
        }

        let url = format!("{}/{}", self.base_url, name);
        let operation: Operation = self.send_json(self.http.get(url)).await?;

        if !operation.done {
            debug!("Video job still running");
            return Ok(JobStatus::Running);
        }

        if let Some(error) = operation.error {
            return Ok(JobStatus::Failed {
                code: error.code,
                message: error.message,
            });
        }

        let video_uri = operation
            .response
            .and_then(|r| r.generate_video_response)
            .and_then(|r| r.generated_samples.into_iter().next())
            .and_then(|sample| sample.video)
            .and_then(|video| video.uri);

        debug!(has_uri = video_uri.is_some(), "Video job finished");
        Ok(JobStatus::Completed { video_uri })
    }

    #[instrument(name = "gemini_download_video", skip(self, uri))]
    async fn download_video_internal(&self, uri: &str) -> GeminiResult<MediaPayload> {
        let response = self
            .http
            .get(uri)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
            .filter(|value| value.starts_with("video/"))
            .unwrap_or_else(|| DEFAULT_VIDEO_MIME.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;
        if bytes.is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::ResponseDecode(
                "downloaded video is empty".to_string(),
            )));
        }

        debug!(bytes = bytes.len(), mime = %mime, "Downloaded generated video");
        Ok(MediaPayload::from_bytes(mime, &bytes))
    }
}

#[async_trait]
impl VideoGeneration for GeminiClient {
    async fn submit_video(&self, req: &VideoJobRequest) -> OverthinkResult<VideoJob> {
        Ok(self.submit_video_internal(req).await?)
    }

    async fn poll_video(&self, job: &VideoJob) -> OverthinkResult<JobStatus> {
        Ok(self.poll_video_internal(job).await?)
    }

    async fn download_video(&self, uri: &str) -> OverthinkResult<MediaPayload> {
        Ok(self.download_video_internal(uri).await?)
    }

    fn video_model_name(&self) -> &str {
        &self.video_model
    }
}
