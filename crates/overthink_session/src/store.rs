//! In-memory session store with epoch-checked completion.

use crate::{AnalysisPhase, GateUpdate, MediaState, Session, SessionView};
use overthink_core::{FullAnalysis, GeneratedMedia, MediaSlot, Panel, ScenarioKey, SessionId, VideoAsset};
use overthink_error::{FlowError, SessionError, SessionErrorKind};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Permission to run an analysis for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisTicket {
    session: SessionId,
    epoch: u64,
    video: VideoAsset,
}

impl AnalysisTicket {
    /// Session the analysis belongs to.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Video to analyze.
    pub fn video(&self) -> &VideoAsset {
        &self.video
    }
}

/// Permission to generate media for one scenario slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTicket {
    slot: MediaSlot,
    epoch: u64,
    prompt: String,
    video: VideoAsset,
}

impl MediaTicket {
    /// Slot the media is for.
    pub fn slot(&self) -> MediaSlot {
        self.slot
    }

    /// Scenario text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Uploaded video, for reference-based generation.
    pub fn video(&self) -> &VideoAsset {
        &self.video
    }
}

/// Default idle lifetime of a session.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Default cap on live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1_000;

/// Sessions keyed by id.
///
/// Every mutation happens under the write lock with no await inside, so a
/// record is always observed either before or after a change.
///
/// Sessions untouched for longer than the idle TTL are evicted, and opening
/// a session at capacity evicts the least recently active one.
///
/// # Examples
///
/// ```
/// use overthink_core::VideoAsset;
/// use overthink_error::SessionErrorKind;
/// use overthink_session::SessionStore;
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = SessionStore::new();
/// let id = store.create().await;
///
/// // Nothing to analyze yet
/// let err = store.begin_analysis(id).await.unwrap_err();
/// assert_eq!(err.kind, SessionErrorKind::NoVideo);
///
/// let video = VideoAsset::from_bytes("video/mp4", b"clip").unwrap();
/// store.select_video(id, video).await.unwrap();
/// assert!(store.begin_analysis(id).await.is_ok());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_SESSION_TTL, DEFAULT_MAX_SESSIONS)
    }
}

fn not_found(id: SessionId) -> SessionError {
    SessionError::new(SessionErrorKind::NotFound(id.to_string()))
}

/// Look up a session for a request and mark it active.
fn active(sessions: &mut HashMap<SessionId, Session>, id: SessionId) -> Result<&mut Session, SessionError> {
    let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
    session.touch();
    Ok(session)
}

impl SessionStore {
    /// Empty store with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store that evicts sessions idle for `idle_ttl` and holds at
    /// most `max_sessions` (at least one).
    pub fn with_limits(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Idle lifetime of a session.
    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    /// Session cap.
    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Drop every session idle for at least the TTL; returns how many went.
    #[instrument(skip(self))]
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let evicted = Self::evict_expired(&mut sessions, self.idle_ttl);
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    fn evict_expired(sessions: &mut HashMap<SessionId, Session>, ttl: Duration) -> usize {
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, session| now.duration_since(session.last_active) < ttl);
        before - sessions.len()
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// True when no session exists.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Open an empty session, evicting expired ones and, at capacity, the
    /// least recently active.
    #[instrument(skip(self))]
    pub async fn create(&self) -> SessionId {
        let id = SessionId::new();
        let mut sessions = self.sessions.write().await;

        let expired = Self::evict_expired(&mut sessions, self.idle_ttl);
        if expired > 0 {
            debug!(expired, "Evicted idle sessions");
        }
        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .values()
                .min_by_key(|session| session.last_active)
                .map(|session| session.id)
            else {
                break;
            };
            sessions.remove(&oldest);
            warn!(session = %oldest, "Session cap reached, evicted least recently active");
        }

        sessions.insert(id, Session::new(id));
        info!(session = %id, live = sessions.len(), "Session created");
        id
    }

    /// Drop a session.
    pub async fn remove(&self, id: SessionId) -> Result<(), SessionError> {
        if self.sessions.write().await.remove(&id).is_none() {
            return Err(not_found(id));
        }
        debug!(session = %id, "Session removed");
        Ok(())
    }

    /// Snapshot of a session. Viewing counts as activity.
    pub async fn view(&self, id: SessionId) -> Result<SessionView, SessionError> {
        let mut sessions = self.sessions.write().await;
        Ok(active(&mut sessions, id)?.view())
    }

    /// Replace the video, discarding everything derived from the old one.
    #[instrument(skip(self, video), fields(session = %id, mime = %video.mime()))]
    pub async fn select_video(&self, id: SessionId, video: VideoAsset) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = active(&mut sessions, id)?;
        session.reset();
        session.video = Some(video);
        debug!(epoch = session.epoch, "Video selected");
        Ok(())
    }

    /// Start a new analysis, superseding any that is still running.
    #[instrument(skip(self), fields(session = %id))]
    pub async fn begin_analysis(&self, id: SessionId) -> Result<AnalysisTicket, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = active(&mut sessions, id)?;
        let video = session
            .video
            .clone()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoVideo))?;

        if session.analysis == AnalysisPhase::Pending {
            debug!("Superseding running analysis");
        }
        session.reset();
        session.analysis = AnalysisPhase::Pending;

        Ok(AnalysisTicket {
            session: id,
            epoch: session.epoch,
            video,
        })
    }

    /// Apply an analysis outcome if its ticket is still current.
    ///
    /// # Errors
    ///
    /// `Superseded` when the video or analysis changed after the ticket was
    /// issued; the outcome is dropped.
    #[instrument(skip_all, fields(session = %ticket.session, ok = outcome.is_ok()))]
    pub async fn complete_analysis(
        &self,
        ticket: AnalysisTicket,
        outcome: Result<FullAnalysis, &FlowError>,
    ) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = active(&mut sessions, ticket.session)?;

        if session.epoch != ticket.epoch {
            warn!(
                ticket_epoch = ticket.epoch,
                current_epoch = session.epoch,
                "Dropping stale analysis"
            );
            return Err(SessionError::new(SessionErrorKind::Superseded));
        }

        session.analysis = match outcome {
            Ok(full) => AnalysisPhase::Ready(Box::new(full)),
            Err(e) => AnalysisPhase::Failed(e.user_message()),
        };
        Ok(())
    }

    /// Claim a scenario slot for media generation.
    #[instrument(skip(self), fields(session = %id, scenario = %key))]
    pub async fn begin_media(&self, id: SessionId, key: ScenarioKey) -> Result<MediaTicket, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = active(&mut sessions, id)?;
        let slot = MediaSlot::new(id, key);

        let prompt = match &session.analysis {
            AnalysisPhase::Ready(full) => full.overthinking_scenarios.get(key).to_string(),
            AnalysisPhase::Pending => {
                return Err(SessionError::new(SessionErrorKind::AnalysisPending));
            }
            AnalysisPhase::Idle | AnalysisPhase::Failed(_) => {
                return Err(SessionError::new(SessionErrorKind::NoAnalysis));
            }
        };
        let video = session
            .video
            .clone()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoVideo))?;

        let state = session.media_mut(key);
        if *state == MediaState::Pending {
            return Err(SessionError::new(SessionErrorKind::MediaPending(slot.to_string())));
        }
        *state = MediaState::Pending;

        Ok(MediaTicket {
            slot,
            epoch: session.epoch,
            prompt,
            video,
        })
    }

    /// Apply a media outcome if its ticket is still current.
    ///
    /// Only the ticket's own slot is touched.
    #[instrument(skip_all, fields(slot = %ticket.slot, ok = outcome.is_ok()))]
    pub async fn complete_media(
        &self,
        ticket: MediaTicket,
        outcome: Result<&GeneratedMedia, &FlowError>,
    ) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        let id = ticket.slot.session;
        let session = active(&mut sessions, id)?;

        if session.epoch != ticket.epoch {
            warn!(
                ticket_epoch = ticket.epoch,
                current_epoch = session.epoch,
                "Dropping stale media"
            );
            return Err(SessionError::new(SessionErrorKind::Superseded));
        }

        *session.media_mut(ticket.slot.scenario) = match outcome {
            Ok(media) => MediaState::ready(media),
            Err(e) => MediaState::Failed {
                message: e.user_message(),
            },
        };
        Ok(())
    }

    /// Record a panel view; requires a ready analysis.
    #[instrument(skip(self), fields(session = %id, panel = %panel))]
    pub async fn mark_viewed(&self, id: SessionId, panel: Panel) -> Result<GateUpdate, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = active(&mut sessions, id)?;

        match session.analysis {
            AnalysisPhase::Ready(_) => {}
            AnalysisPhase::Pending => {
                return Err(SessionError::new(SessionErrorKind::AnalysisPending));
            }
            AnalysisPhase::Idle | AnalysisPhase::Failed(_) => {
                return Err(SessionError::new(SessionErrorKind::NoAnalysis));
            }
        }

        let update = session.gate.mark_viewed(panel);
        if update.notification.is_some() {
            info!("Conclusion unlocked");
        }
        Ok(update)
    }
}
