//! Route table and handlers.

use crate::{ApiError, AppState, Operation};
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post, put};
use axum::Router;
use overthink_core::{FullAnalysis, MediaKind, Panel, ScenarioKey, SessionId, VideoAsset};
use overthink_rate_limit::ServerConfig;
use overthink_session::{GateUpdate, SessionView};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, info, instrument};

/// Body of `PUT /sessions/{id}/video`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectVideo {
    /// `data:video/...;base64,...`
    pub video_data_uri: String,
}

/// Body returned for generated scenario media.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    /// Scenario the media illustrates
    pub scenario: ScenarioKey,
    /// Image or video
    pub kind: MediaKind,
    /// The media as a data URI
    pub data_uri: String,
}

/// All routes, with tracing and the upload size limit applied.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(view_session).delete(delete_session))
        .route("/sessions/{id}/video", put(select_video))
        .route("/sessions/{id}/analyze", post(analyze))
        .route("/sessions/{id}/panels/{panel}/view", post(view_panel))
        .route("/sessions/{id}/scenarios/{key}/media", post(scenario_media))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn session_id(raw: &str) -> Result<SessionId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid session id '{}'", raw)))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let id = state.sessions().create().await;
    (StatusCode::CREATED, Json(json!({ "id": id })))
}

async fn view_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state.sessions().view(session_id(&id)?).await?;
    Ok(Json(view))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.sessions().remove(session_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn select_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SelectVideo>,
) -> Result<Json<SessionView>, ApiError> {
    let id = session_id(&id)?;
    let video = VideoAsset::parse(&body.video_data_uri)
        .map_err(|e| ApiError::BadRequest(e.kind.to_string()))?;
    state.sessions().select_video(id, video).await?;
    Ok(Json(state.sessions().view(id).await?))
}

#[instrument(skip(state))]
async fn analyze(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FullAnalysis>, ApiError> {
    let ticket = state.sessions().begin_analysis(session_id(&id)?).await?;

    // Detached so a dropped connection still settles the session.
    let task_state = state.clone();
    let outcome = tokio::spawn(
        async move {
            let outcome = task_state.orchestrator().analyze(ticket.video()).await;
            task_state
                .sessions()
                .complete_analysis(ticket, outcome.as_ref().cloned())
                .await?;
            Ok::<_, ApiError>(outcome)
        }
        .in_current_span(),
    )
    .await??;

    let full = outcome.map_err(|e| ApiError::flow(Operation::Analysis, e))?;
    info!("Analysis delivered");
    Ok(Json(full))
}

async fn view_panel(
    State(state): State<AppState>,
    Path((id, panel)): Path<(String, String)>,
) -> Result<Json<GateUpdate>, ApiError> {
    let id = session_id(&id)?;
    let panel: Panel = panel
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Unknown panel '{}'", panel)))?;
    Ok(Json(state.sessions().mark_viewed(id, panel).await?))
}

#[instrument(skip(state))]
async fn scenario_media(
    State(state): State<AppState>,
    Path((id, key)): Path<(String, String)>,
) -> Result<Json<MediaResponse>, ApiError> {
    let id = session_id(&id)?;
    let key: ScenarioKey = key
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Unknown scenario '{}'", key)))?;

    let ticket = state.sessions().begin_media(id, key).await?;

    let task_state = state.clone();
    let outcome = tokio::spawn(
        async move {
            let outcome = task_state
                .orchestrator()
                .generate_scenario_media(ticket.slot(), ticket.prompt(), Some(ticket.video()))
                .await;
            task_state
                .sessions()
                .complete_media(ticket, outcome.as_ref())
                .await?;
            Ok::<_, ApiError>(outcome)
        }
        .in_current_span(),
    )
    .await??;

    let media = outcome.map_err(|e| ApiError::flow(Operation::Media, e))?;
    Ok(Json(MediaResponse {
        scenario: key,
        kind: *media.kind(),
        data_uri: media.data_uri(),
    }))
}
