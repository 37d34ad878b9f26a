//! Short scenario videos through a long-running provider job.
//!
//! Submit, wait one interval, then poll at a fixed interval until the job
//! finishes or the poll budget runs out.

use super::provider_failure;
use async_trait::async_trait;
use overthink_core::GeneratedMedia;
use overthink_error::{FlowError, FlowErrorKind, Stage};
use overthink_interface::{AspectRatio, JobStatus, PromptFlow, VideoGeneration, VideoJobRequest};
use overthink_rate_limit::VideoSettings;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_retry2::strategy::FixedInterval;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, info, instrument, warn};

/// Why one poll did not yield a media URI.
#[derive(Debug, derive_more::Display)]
enum PollError {
    /// Job still running
    #[display("video job still running")]
    Pending,
    /// Job finished unusably, or the status check itself failed
    #[display("{}", _0)]
    Failed(FlowError),
}

/// Generates one short video per call.
pub struct VideoFlow {
    backend: Arc<dyn VideoGeneration>,
    settings: VideoSettings,
}

impl VideoFlow {
    /// Flow on `backend` with the configured clip and poll settings.
    pub fn new(backend: Arc<dyn VideoGeneration>, settings: VideoSettings) -> Self {
        Self { backend, settings }
    }

    fn job_request(&self, prompt: &str) -> Result<VideoJobRequest, FlowError> {
        let aspect_ratio: AspectRatio = self.settings.aspect_ratio.parse().map_err(|_| {
            FlowError::generation(
                Stage::Video,
                format!("unsupported aspect ratio '{}'", self.settings.aspect_ratio),
            )
        })?;

        VideoJobRequest::builder()
            .prompt(prompt)
            .duration_secs(self.settings.duration_secs)
            .aspect_ratio(aspect_ratio)
            .build()
            .map_err(|e| FlowError::generation(Stage::Video, format!("invalid request: {}", e)))
    }

    /// Poll until the job reports a media URI, fails, or the budget is spent.
    async fn await_video_uri(&self, job: &overthink_interface::VideoJob) -> Result<String, FlowError> {
        let interval = Duration::from_secs(self.settings.poll_interval_secs);
        let max_polls = self.settings.max_polls.max(1);
        let attempts = AtomicUsize::new(0);

        // First check happens one interval after submission
        tokio::time::sleep(interval).await;

        let backend = &self.backend;
        let attempts_ref = &attempts;
        let strategy = FixedInterval::new(interval).take(max_polls - 1);

        let outcome = Retry::spawn(strategy, move || async move {
            let attempt = attempts_ref.fetch_add(1, Ordering::Relaxed) + 1;
            match backend.poll_video(job).await {
                Ok(JobStatus::Running) => {
                    debug!(attempt, "Video job still running");
                    Err(RetryError::Transient {
                        err: PollError::Pending,
                        retry_after: None,
                    })
                }
                Ok(JobStatus::Completed {
                    video_uri: Some(uri),
                }) => Ok(uri),
                Ok(JobStatus::Completed { video_uri: None }) => {
                    Err(RetryError::Permanent(PollError::Failed(FlowError::media_retrieval(
                        "Failed to find the generated video in the operation result",
                    ))))
                }
                Ok(JobStatus::Failed { code, message }) => {
                    warn!(attempt, ?code, %message, "Video job failed");
                    Err(RetryError::Permanent(PollError::Failed(FlowError::media_retrieval(
                        format!("Failed to generate video: {}", message),
                    ))))
                }
                Err(e) => Err(RetryError::Permanent(PollError::Failed(
                    FlowError::media_retrieval(format!(
                        "Failed to check video status: {}",
                        e.message()
                    )),
                ))),
            }
        })
        .await;

        match outcome {
            Ok(uri) => Ok(uri),
            Err(PollError::Failed(e)) => Err(e),
            Err(PollError::Pending) => {
                let attempts = attempts.load(Ordering::Relaxed);
                let waited_secs = self.settings.poll_interval_secs * attempts as u64;
                warn!(attempts, waited_secs, "Video job did not finish within the poll budget");
                Err(FlowError::new(FlowErrorKind::Timeout {
                    attempts,
                    waited_secs,
                }))
            }
        }
    }
}

#[async_trait]
impl PromptFlow for VideoFlow {
    type Input = String;
    type Output = GeneratedMedia;

    fn stage(&self) -> Stage {
        Stage::Video
    }

    #[instrument(
        skip(self, prompt),
        fields(stage = %Stage::Video, model = %self.backend.video_model_name(), max_polls = self.settings.max_polls)
    )]
    async fn execute(&self, prompt: &String) -> Result<GeneratedMedia, FlowError> {
        if prompt.trim().is_empty() {
            return Err(FlowError::generation(Stage::Video, "nothing to animate"));
        }

        let request = self.job_request(prompt)?;
        let job = self
            .backend
            .submit_video(&request)
            .await
            .map_err(|e| provider_failure(Stage::Video, &e))?;
        info!(job = %job.name(), "Video job submitted, polling");

        let uri = self.await_video_uri(&job).await?;

        let payload = self.backend.download_video(&uri).await.map_err(|e| {
            FlowError::media_retrieval(format!("Failed to download video: {}", e.message()))
        })?;

        debug!(mime = %payload.mime(), bytes = payload.decoded_len(), "Video downloaded");
        Ok(GeneratedMedia::video(payload))
    }
}
