use overthink_pipeline::Orchestrator;
use overthink_session::SessionStore;
use std::sync::Arc;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    sessions: SessionStore,
    orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Session store with default limits around `orchestrator`.
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self::with_sessions(orchestrator, SessionStore::new())
    }

    /// State over an existing store.
    pub fn with_sessions(orchestrator: Arc<Orchestrator>, sessions: SessionStore) -> Self {
        Self {
            sessions,
            orchestrator,
        }
    }

    /// Session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Pipeline.
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }
}
