//! HTTP presentation shell for Overthink.
//!
//! Routes map one-to-one onto session store and orchestrator operations:
//! upload a video, run the analysis, view panels to unlock the conclusion,
//! and generate media for each overthinking scenario on demand.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod routes;
mod state;

pub use error::{ApiError, Operation};
pub use routes::{MediaResponse, SelectVideo, router};
pub use state::AppState;

use overthink_error::{OverthinkResult, ServerError, ServerErrorKind};
use overthink_models::GeminiClient;
use overthink_pipeline::Orchestrator;
use overthink_rate_limit::OverthinkConfig;
use overthink_session::SessionStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Build the Gemini-backed application state from configuration.
pub fn state_from_config(config: &OverthinkConfig) -> OverthinkResult<AppState> {
    let client = Arc::new(GeminiClient::new(config)?);
    let orchestrator = Orchestrator::new(
        client.clone(),
        client,
        &config.models,
        config.pipeline.clone(),
    );
    let sessions = SessionStore::with_limits(config.server.session_ttl(), config.server.max_sessions);
    Ok(AppState::with_sessions(Arc::new(orchestrator), sessions))
}

/// Periodically drop idle sessions so abandoned uploads do not pile up.
fn spawn_session_sweeper(sessions: SessionStore) -> tokio::task::JoinHandle<()> {
    let period = sessions
        .idle_ttl()
        .clamp(Duration::from_secs(1), Duration::from_secs(60));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let evicted = sessions.evict_idle().await;
            debug!(evicted, "Session sweep");
        }
    })
}

/// Serve until Ctrl-C.
#[instrument(skip_all, fields(host = %config.server.host, port = config.server.port))]
pub async fn serve(config: OverthinkConfig) -> OverthinkResult<()> {
    let state = state_from_config(&config)?;
    let sessions = state.sessions().clone();
    let app = router(state, &config.server);

    let addr_text = format!("{}:{}", config.server.host, config.server.port);
    let addr: SocketAddr = addr_text
        .parse()
        .map_err(|_| ServerError::new(ServerErrorKind::InvalidAddress(addr_text.clone())))?;

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        ServerError::new(ServerErrorKind::Bind {
            addr: addr_text.clone(),
            message: e.to_string(),
        })
    })?;
    info!(%addr, "Listening");
    let sweeper = spawn_session_sweeper(sessions);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())));
    sweeper.abort();
    served?;
    Ok(())
}
