//! Test utilities for pipeline tests.
//!
//! Scripted providers: the generative mock answers by which prompt it sees,
//! the video mock plays back a list of job statuses.

#![allow(dead_code)]

use async_trait::async_trait;
use overthink_core::{
    GenerateRequest, GenerateResponse, Input, MediaPayload, Output, VideoAsset,
};
use overthink_error::{GeminiError, GeminiErrorKind, OverthinkError, OverthinkResult};
use overthink_interface::{GenerativeDriver, JobStatus, VideoGeneration, VideoJob, VideoJobRequest};
use overthink_rate_limit::{ModelsConfig, OverthinkConfig};
use std::sync::{Arc, Mutex};

/// Needle found only in the extraction prompt.
pub const EXTRACTION: &str = "extracts key events";
/// Needle found only in the analysis prompts.
pub const ANALYSIS: &str = "generate a witty analysis";
/// Needle found only in the scenario prompt.
pub const SCENARIOS: &str = "\"what if\" scenarios";
/// Needle found only in the image prompt.
pub const IMAGE: &str = "Using the people and context";

/// A scripted reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Text output
    Text(String),
    /// Inline PNG output alongside a short caption
    Image(Vec<u8>),
    /// No outputs at all
    Empty,
    /// Provider error
    Error(GeminiErrorKind),
}

/// One request as the mock saw it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Model requested
    pub model: Option<String>,
    /// All text parts joined
    pub text: String,
    /// Number of inline video parts
    pub videos: usize,
}

/// Generative driver answering by prompt content.
#[derive(Clone, Default)]
pub struct MockDriver {
    rules: Vec<(&'static str, MockResponse)>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockDriver {
    /// Empty driver; every call errors until rules are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `response` to prompts containing `needle`.
    pub fn on(mut self, needle: &'static str, response: MockResponse) -> Self {
        self.rules.push((needle, response));
        self
    }

    /// Shorthand for a text rule.
    pub fn on_text(self, needle: &'static str, text: impl Into<String>) -> Self {
        self.on(needle, MockResponse::Text(text.into()))
    }

    /// Driver scripted with the happy path for every prompt.
    pub fn happy() -> Self {
        Self::new()
            .on_text(EXTRACTION, EXTRACTION_REPLY)
            .on_text(ANALYSIS, ANALYSIS_REPLY)
            .on_text(SCENARIOS, SCENARIOS_REPLY)
            .on(IMAGE, MockResponse::Image(vec![0x89, b'P', b'N', b'G']))
    }

    /// Every call so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls whose prompt contained `needle`.
    pub fn calls_matching(&self, needle: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.text.contains(needle))
            .collect()
    }

    /// Number of calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeDriver for MockDriver {
    async fn generate(&self, req: &GenerateRequest) -> OverthinkResult<GenerateResponse> {
        let mut text = String::new();
        let mut videos = 0;
        for input in req.messages.iter().flat_map(|m| m.content.iter()) {
            match input {
                Input::Text(t) => text.push_str(t),
                Input::Video { .. } => videos += 1,
                _ => {}
            }
        }
        self.calls.lock().unwrap().push(RecordedCall {
            model: req.model.clone(),
            text: text.clone(),
            videos,
        });

        // Keep concurrent flows interleaved
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;

        let Some((_, response)) = self.rules.iter().find(|(needle, _)| text.contains(needle))
        else {
            return Err(OverthinkError::from(GeminiError::new(GeminiErrorKind::ApiRequest(
                "no scripted reply".to_string(),
            ))));
        };

        match response {
            MockResponse::Text(t) => Ok(GenerateResponse {
                outputs: vec![Output::Text(t.clone())],
            }),
            MockResponse::Image(bytes) => Ok(GenerateResponse {
                outputs: vec![
                    Output::Text("Here is your image.".to_string()),
                    Output::Image {
                        mime: Some("image/png".to_string()),
                        data: bytes.clone(),
                    },
                ],
            }),
            MockResponse::Empty => Ok(GenerateResponse::default()),
            MockResponse::Error(kind) => Err(GeminiError::new(kind.clone()).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-text"
    }
}

/// Video backend playing back scripted poll results.
#[derive(Clone)]
pub struct MockVideo {
    submit_error: Option<GeminiErrorKind>,
    statuses: Vec<JobStatus>,
    download: Option<MediaPayload>,
    polls: Arc<Mutex<usize>>,
    submitted: Arc<Mutex<Vec<VideoJobRequest>>>,
}

impl MockVideo {
    /// Backend returning `statuses` in order, repeating the last one.
    pub fn with_statuses(statuses: Vec<JobStatus>) -> Self {
        Self {
            submit_error: None,
            statuses,
            download: Some(MediaPayload::from_bytes("video/mp4", b"generated clip")),
            polls: Arc::new(Mutex::new(0)),
            submitted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Backend whose jobs finish on the `after`-th poll.
    pub fn completing_after(after: usize) -> Self {
        let mut statuses = vec![JobStatus::Running; after.saturating_sub(1)];
        statuses.push(JobStatus::Completed {
            video_uri: Some("https://files.example/clip".to_string()),
        });
        Self::with_statuses(statuses)
    }

    /// Backend whose jobs never finish.
    pub fn never_completing() -> Self {
        Self::with_statuses(vec![JobStatus::Running])
    }

    /// Backend rejecting every submission.
    pub fn rejecting(kind: GeminiErrorKind) -> Self {
        Self {
            submit_error: Some(kind),
            ..Self::never_completing()
        }
    }

    /// Backend whose download fails.
    pub fn without_download(mut self) -> Self {
        self.download = None;
        self
    }

    /// Status checks made so far.
    pub fn polls(&self) -> usize {
        *self.polls.lock().unwrap()
    }

    /// Requests submitted so far.
    pub fn submitted(&self) -> Vec<VideoJobRequest> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoGeneration for MockVideo {
    async fn submit_video(&self, request: &VideoJobRequest) -> OverthinkResult<VideoJob> {
        if let Some(kind) = &self.submit_error {
            return Err(GeminiError::new(kind.clone()).into());
        }
        self.submitted.lock().unwrap().push(request.clone());
        Ok(VideoJob::new("models/mock-video/operations/op-1"))
    }

    async fn poll_video(&self, _job: &VideoJob) -> OverthinkResult<JobStatus> {
        let mut polls = self.polls.lock().unwrap();
        let index = (*polls).min(self.statuses.len().saturating_sub(1));
        *polls += 1;
        Ok(self.statuses[index].clone())
    }

    async fn download_video(&self, _uri: &str) -> OverthinkResult<MediaPayload> {
        self.download.clone().ok_or_else(|| {
            GeminiError::new(GeminiErrorKind::HttpError {
                status_code: 404,
                message: "file expired".to_string(),
            })
            .into()
        })
    }

    fn video_model_name(&self) -> &str {
        "mock-video"
    }
}

/// Extraction reply with two events.
pub const EXTRACTION_REPLY: &str =
    r#"{"eventsAndOutcomes": ["Alice gave a talk", "Bob spilled coffee"]}"#;

/// Devil's-advocate analysis reply.
pub const ANALYSIS_REPLY: &str = r#"```json
{
  "wentWell": {"main": "The talk landed.", "devilsAdvocate": "Low bar, though."},
  "couldHaveGoneBetter": {"main": "The coffee.", "devilsAdvocate": "Caffeine is overrated."},
  "conclusion": "A day of triumph and stains."
}
```"#;

/// Scenario reply.
pub const SCENARIOS_REPLY: &str =
    r#"{"scenario1": "The coffee becomes sentient.", "scenario2": "Alice's slides are a prophecy."}"#;

/// Small uploaded video.
pub fn sample_video() -> VideoAsset {
    VideoAsset::from_bytes("video/mp4", b"\x00\x00\x00\x18ftypmp42").unwrap()
}

/// Model ids from the bundled configuration.
pub fn models() -> ModelsConfig {
    OverthinkConfig::bundled().unwrap().models
}
