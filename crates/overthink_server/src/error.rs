//! Handler errors and their JSON rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use overthink_error::{FlowError, FlowErrorKind, SessionError, SessionErrorKind};
use serde_json::json;
use tracing::{error, warn};

/// User action a pipeline failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Operation {
    /// Full analysis of the uploaded video
    #[display("analysis")]
    Analysis,
    /// Scenario media
    #[display("media")]
    Media,
}

/// Everything a handler can fail with.
///
/// Renders as `{"error": "<message>"}` with a status chosen by kind:
/// 404 unknown session, 400 bad input or missing prerequisite, 409 busy or
/// superseded, 500 lost background task, 502 provider failure.
#[derive(Debug, derive_more::Display)]
pub enum ApiError {
    /// Session store refused the operation
    #[display("{}", _0.kind)]
    Session(SessionError),
    /// The pipeline failed
    #[display("Failed to generate {}: {}", operation, error.kind)]
    Flow {
        /// What the user asked for
        operation: Operation,
        /// Why it failed
        error: FlowError,
    },
    /// Malformed request
    #[display("{}", _0)]
    BadRequest(String),
    /// A detached generation task panicked or was cancelled
    #[display("Background task failed: {}", _0)]
    Internal(String),
}

impl ApiError {
    /// Pipeline failure during `operation`.
    pub fn flow(operation: Operation, error: FlowError) -> Self {
        Self::Flow { operation, error }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Session(e) => match e.kind {
                SessionErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
                SessionErrorKind::NoVideo | SessionErrorKind::NoAnalysis => StatusCode::BAD_REQUEST,
                SessionErrorKind::AnalysisPending
                | SessionErrorKind::MediaPending(_)
                | SessionErrorKind::Superseded => StatusCode::CONFLICT,
            },
            Self::Flow { error, .. } => match error.kind {
                FlowErrorKind::ScenarioBusy(_) => StatusCode::CONFLICT,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!(%status, error = %message, "Request failed");
        } else {
            warn!(%status, error = %message, "Request rejected");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
