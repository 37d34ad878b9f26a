//! Exercises the REST client against a local fake Gemini endpoint.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use overthink_core::{GenerateRequest, Input, Message, Modality, VideoAsset};
use overthink_error::{GeminiErrorKind, OverthinkErrorKind};
use overthink_interface::{GenerativeDriver, JobStatus, VideoGeneration, VideoJobRequest};
use overthink_models::GeminiClient;
use overthink_rate_limit::OverthinkConfig;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const API_KEY: &str = "test-key";

#[derive(Clone, Default)]
struct FakeGemini {
    base: String,
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
    polls: Arc<Mutex<usize>>,
}

async fn model_call(
    State(state): State<FakeGemini>,
    Path(call): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if query.get("key").map(String::as_str) != Some(API_KEY) {
        return (StatusCode::FORBIDDEN, Json(json!({"error": {"code": 403, "message": "bad key"}})));
    }
    state.bodies.lock().unwrap().push((call.clone(), body));

    match call.as_str() {
        "gemini-2.0-flash:generateContent" => (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "{\"eventsAndOutcomes\": [\"A cat sat\"]}"}]},
                    "finishReason": "STOP"
                }]
            })),
        ),
        "gemini-2.0-flash-preview-image-generation:generateContent" => (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": {"parts": [
                        {"text": "Here is your image"},
                        {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                    ]}
                }]
            })),
        ),
        "veo-2.0-generate-001:predictLongRunning" => (
            StatusCode::OK,
            Json(json!({"name": "models/veo-2.0-generate-001/operations/op-1"})),
        ),
        _ => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": {"code": 429, "message": "Resource exhausted", "status": "RESOURCE_EXHAUSTED"}})),
        ),
    }
}

async fn operation(
    State(state): State<FakeGemini>,
    Path((_model, op)): Path<(String, String)>,
) -> Json<Value> {
    let mut polls = state.polls.lock().unwrap();
    *polls += 1;
    if *polls < 2 {
        return Json(json!({"name": op, "done": false}));
    }
    Json(json!({
        "name": op,
        "done": true,
        "response": {
            "generateVideoResponse": {
                "generatedSamples": [{"video": {"uri": format!("{}/files/clip?alt=media", state.base)}}]
            }
        }
    }))
}

async fn file(Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    if query.get("key").map(String::as_str) != Some(API_KEY) || !query.contains_key("alt") {
        return (StatusCode::FORBIDDEN, [(header::CONTENT_TYPE, "text/plain")], b"denied".to_vec());
    }
    (StatusCode::OK, [(header::CONTENT_TYPE, "video/mp4")], b"fake mp4 bytes".to_vec())
}

async fn empty_file(Query(query): Query<HashMap<String, String>>) -> impl IntoResponse {
    if query.get("key").map(String::as_str) != Some(API_KEY) {
        return (StatusCode::FORBIDDEN, [(header::CONTENT_TYPE, "text/plain")], b"denied".to_vec());
    }
    (StatusCode::OK, [(header::CONTENT_TYPE, "video/mp4")], Vec::new())
}

async fn spawn_fake() -> anyhow::Result<(FakeGemini, GeminiClient)> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = FakeGemini {
        base: format!("http://{}", addr),
        ..Default::default()
    };

    let app = Router::new()
        .route("/v1beta/models/{call}", post(model_call))
        .route("/v1beta/models/{model}/operations/{op}", get(operation))
        .route("/files/clip", get(file))
        .route("/files/empty", get(empty_file))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let mut config = OverthinkConfig::bundled()?;
    config.models = config.models.clone().with_base_url(format!("{}/v1beta", state.base));
    let client = GeminiClient::with_api_key(API_KEY, &config)?;
    Ok((state, client))
}

#[tokio::test]
async fn test_generate_text_with_inline_video() -> anyhow::Result<()> {
    let (fake, client) = spawn_fake().await?;
    let video = VideoAsset::parse("data:video/mp4;base64,AAAA")?;

    let request = GenerateRequest::builder()
        .messages(vec![Message::user(vec![
            Input::from(&video),
            Input::Text("Extract events".to_string()),
        ])])
        .response_mime_type("application/json")
        .build()?;

    let response = client.generate(&request).await?;
    assert_eq!(response.text(), "{\"eventsAndOutcomes\": [\"A cat sat\"]}");

    let bodies = fake.bodies.lock().unwrap();
    let (_, body) = &bodies[0];
    assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["mimeType"], "video/mp4");
    assert_eq!(body["contents"][0]["parts"][1]["text"], "Extract events");
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    Ok(())
}

#[tokio::test]
async fn test_generate_image_returns_inline_data() -> anyhow::Result<()> {
    let (fake, client) = spawn_fake().await?;

    let request = GenerateRequest::builder()
        .messages(vec![Message::user(vec![Input::Text("Draw".to_string())])])
        .model("gemini-2.0-flash-preview-image-generation")
        .response_modalities(vec![Modality::Text, Modality::Image])
        .build()?;

    let response = client.generate(&request).await?;
    let image = response.first_image().expect("image part");
    assert_eq!(image.to_string(), "data:image/png;base64,iVBORw0KGgo=");

    let bodies = fake.bodies.lock().unwrap();
    assert_eq!(
        bodies[0].1["generationConfig"]["responseModalities"],
        json!(["TEXT", "IMAGE"])
    );
    Ok(())
}

#[tokio::test]
async fn test_http_errors_carry_provider_message() -> anyhow::Result<()> {
    let (_fake, client) = spawn_fake().await?;

    let request = GenerateRequest::builder()
        .messages(vec![Message::user(vec![Input::Text("Hi".to_string())])])
        .model("unknown-model")
        .build()?;

    let err = client.generate(&request).await.unwrap_err();
    match err.kind() {
        OverthinkErrorKind::Gemini(gemini) => assert_eq!(
            gemini.kind,
            GeminiErrorKind::HttpError {
                status_code: 429,
                message: "Resource exhausted".to_string(),
            }
        ),
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_video_job_lifecycle() -> anyhow::Result<()> {
    let (fake, client) = spawn_fake().await?;

    let job = client
        .submit_video(&VideoJobRequest::builder().prompt("A dog overthinks").build()?)
        .await?;
    assert_eq!(job.name(), "models/veo-2.0-generate-001/operations/op-1");

    {
        let bodies = fake.bodies.lock().unwrap();
        let (_, body) = &bodies[0];
        assert_eq!(body["instances"][0]["prompt"], "A dog overthinks");
        assert_eq!(body["parameters"]["aspectRatio"], "16:9");
        assert_eq!(body["parameters"]["durationSeconds"], 5);
        assert_eq!(body["parameters"]["sampleCount"], 1);
    }

    assert_eq!(client.poll_video(&job).await?, JobStatus::Running);
    let uri = match client.poll_video(&job).await? {
        JobStatus::Completed { video_uri: Some(uri) } => uri,
        other => panic!("unexpected status: {other:?}"),
    };

    let media = client.download_video(&uri).await?;
    assert_eq!(media.mime(), "video/mp4");
    assert_eq!(media.decode()?, b"fake mp4 bytes");
    Ok(())
}

#[tokio::test]
async fn test_empty_video_download_rejected() -> anyhow::Result<()> {
    let (fake, client) = spawn_fake().await?;

    let err = client
        .download_video(&format!("{}/files/empty?alt=media", fake.base))
        .await
        .unwrap_err();
    match err.kind() {
        OverthinkErrorKind::Gemini(e) => {
            assert_eq!(
                e.kind,
                GeminiErrorKind::ResponseDecode("downloaded video is empty".to_string())
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn test_empty_api_key_rejected() -> anyhow::Result<()> {
    let config = OverthinkConfig::bundled()?;
    let err = GeminiClient::with_api_key("  ", &config).unwrap_err();
    assert!(err.to_string().contains("GEMINI_API_KEY"));
    Ok(())
}

#[cfg(feature = "api")]
#[tokio::test]
async fn test_live_text_generation() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let client = GeminiClient::new(&OverthinkConfig::load()?)?;
    let request = GenerateRequest::builder()
        .messages(vec![Message::user(vec![Input::Text(
            "Reply with the single word: pong".to_string(),
        )])])
        .build()?;
    let response = client.generate(&request).await?;
    assert!(!response.text().trim().is_empty());
    Ok(())
}
