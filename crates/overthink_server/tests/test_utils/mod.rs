//! Scripted providers and request helpers for route tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use overthink_core::{GenerateRequest, GenerateResponse, Input, MediaPayload, Output};
use overthink_error::{GeminiError, GeminiErrorKind, OverthinkResult};
use overthink_interface::{GenerativeDriver, JobStatus, VideoGeneration, VideoJob, VideoJobRequest};
use overthink_pipeline::Orchestrator;
use overthink_rate_limit::{OverthinkConfig, PipelineConfig};
use overthink_server::{AppState, router};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// Driver answering each prompt with a canned reply.
#[derive(Clone)]
pub struct ScriptedDriver {
    pub extraction: String,
    pub scenarios: String,
    pub image: bool,
    /// Virtual time spent on every call
    pub delay: Duration,
    pub calls: Arc<Mutex<usize>>,
}

impl Default for ScriptedDriver {
    fn default() -> Self {
        Self {
            extraction: r#"{"eventsAndOutcomes": ["Alice gave a talk", "Bob spilled coffee"]}"#
                .to_string(),
            scenarios: r#"{"scenario1": "The coffee becomes sentient.", "scenario2": "The slides were a prophecy."}"#
                .to_string(),
            image: true,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(0)),
        }
    }
}

const ANALYSIS_REPLY: &str = r#"{
  "wentWell": {"main": "The talk landed.", "devilsAdvocate": "Low bar."},
  "couldHaveGoneBetter": {"main": "The coffee.", "devilsAdvocate": "Overrated."},
  "conclusion": "Triumph and stains."
}"#;

#[async_trait]
impl GenerativeDriver for ScriptedDriver {
    async fn generate(&self, req: &GenerateRequest) -> OverthinkResult<GenerateResponse> {
        *self.calls.lock().unwrap() += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let text: String = req
            .messages
            .iter()
            .flat_map(|m| m.content.iter())
            .filter_map(|input| match input {
                Input::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();

        let reply = if text.contains("extracts key events") {
            self.extraction.clone()
        } else if text.contains("generate a witty analysis") {
            ANALYSIS_REPLY.to_string()
        } else if text.contains("\"what if\" scenarios") {
            self.scenarios.clone()
        } else if self.image {
            return Ok(GenerateResponse {
                outputs: vec![Output::Image {
                    mime: Some("image/png".to_string()),
                    data: b"png".to_vec(),
                }],
            });
        } else {
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: 503,
                message: "image model overloaded".to_string(),
            })
            .into());
        };

        Ok(GenerateResponse {
            outputs: vec![Output::Text(reply)],
        })
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-text"
    }
}

/// Video backend that finishes on the first poll.
pub struct InstantVideo;

#[async_trait]
impl VideoGeneration for InstantVideo {
    async fn submit_video(&self, _request: &VideoJobRequest) -> OverthinkResult<VideoJob> {
        Ok(VideoJob::new("operations/instant"))
    }

    async fn poll_video(&self, _job: &VideoJob) -> OverthinkResult<JobStatus> {
        Ok(JobStatus::Completed {
            video_uri: Some("https://files.example/clip".to_string()),
        })
    }

    async fn download_video(&self, _uri: &str) -> OverthinkResult<MediaPayload> {
        Ok(MediaPayload::from_bytes("video/mp4", b"clip"))
    }

    fn video_model_name(&self) -> &str {
        "instant-video"
    }
}

/// Router over the scripted providers with the bundled configuration.
pub fn app(driver: ScriptedDriver) -> Router {
    app_with(driver, PipelineConfig::default())
}

/// Router with custom pipeline switches.
pub fn app_with(driver: ScriptedDriver, pipeline: PipelineConfig) -> Router {
    let config = OverthinkConfig::bundled().unwrap();
    let orchestrator = Orchestrator::new(
        Arc::new(driver),
        Arc::new(InstantVideo),
        &config.models,
        pipeline,
    );
    router(AppState::new(Arc::new(orchestrator)), &config.server)
}

/// Data URI of a tiny "video".
pub fn video_data_uri() -> String {
    MediaPayload::from_bytes("video/mp4", b"\x00\x00\x00\x18ftypmp42").to_string()
}

/// Send one request and return status and JSON body (Null when empty).
pub async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, json))
}

/// Create a session with the sample video selected; returns its id.
pub async fn session_with_video(app: &Router) -> anyhow::Result<String> {
    let (_, created) = call(app, "POST", "/sessions", None).await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();
    let (status, _) = call(
        app,
        "PUT",
        &format!("/sessions/{}/video", id),
        Some(serde_json::json!({ "videoDataUri": video_data_uri() })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::OK, "video upload failed: {}", status);
    Ok(id)
}
