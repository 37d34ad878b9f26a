//! The session record and its serialisable snapshot.

use crate::{GateState, UnlockGate};
use overthink_core::{
    FullAnalysis, GeneratedMedia, MediaKind, MediaPayload, ScenarioKey, ScenarioPair, Section, SessionId,
    VideoAsset,
};
use serde::Serialize;
use tokio::time::Instant;

/// Where the session's analysis stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisPhase {
    /// Nothing requested since the last video was selected
    #[default]
    Idle,
    /// An analysis is running
    Pending,
    /// The latest analysis
    Ready(Box<FullAnalysis>),
    /// The latest analysis failed with this message
    Failed(String),
}

/// State of one scenario media slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MediaState {
    /// Nothing generated; the trigger is available
    #[default]
    Empty,
    /// Generation in flight
    Pending,
    /// Generated media
    #[serde(rename_all = "camelCase")]
    Ready {
        /// The media as a data URI
        data_uri: String,
        /// Image or video
        kind: MediaKind,
    },
    /// The last attempt failed; the trigger is available again
    Failed {
        /// Why it failed
        message: String,
    },
}

impl MediaState {
    pub(crate) fn ready(media: &GeneratedMedia) -> Self {
        Self::Ready {
            data_uri: media.data_uri(),
            kind: *media.kind(),
        }
    }
}

/// One upload session.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) epoch: u64,
    pub(crate) video: Option<VideoAsset>,
    pub(crate) analysis: AnalysisPhase,
    pub(crate) scenario1: MediaState,
    pub(crate) scenario2: MediaState,
    pub(crate) gate: UnlockGate,
    pub(crate) last_active: Instant,
}

impl Session {
    pub(crate) fn new(id: SessionId) -> Self {
        Self {
            id,
            epoch: 0,
            video: None,
            analysis: AnalysisPhase::default(),
            scenario1: MediaState::default(),
            scenario2: MediaState::default(),
            gate: UnlockGate::default(),
            last_active: Instant::now(),
        }
    }

    /// Last time a request read or changed this session.
    pub fn last_active(&self) -> Instant {
        self.last_active
    }

    pub(crate) fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    /// Session id.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Bumped every time the video or the analysis is replaced.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Selected video, if any.
    pub fn video(&self) -> Option<&VideoAsset> {
        self.video.as_ref()
    }

    /// Analysis phase.
    pub fn analysis(&self) -> &AnalysisPhase {
        &self.analysis
    }

    /// Unlock gate.
    pub fn gate(&self) -> &UnlockGate {
        &self.gate
    }

    /// Media slot for a scenario.
    pub fn media(&self, key: ScenarioKey) -> &MediaState {
        match key {
            ScenarioKey::Scenario1 => &self.scenario1,
            ScenarioKey::Scenario2 => &self.scenario2,
        }
    }

    pub(crate) fn media_mut(&mut self, key: ScenarioKey) -> &mut MediaState {
        match key {
            ScenarioKey::Scenario1 => &mut self.scenario1,
            ScenarioKey::Scenario2 => &mut self.scenario2,
        }
    }

    /// Drop analysis, media, and gate progress and start a new epoch.
    pub(crate) fn reset(&mut self) {
        self.epoch += 1;
        self.analysis = AnalysisPhase::Idle;
        self.scenario1 = MediaState::Empty;
        self.scenario2 = MediaState::Empty;
        self.gate.reset();
    }

    /// Snapshot for display.
    pub fn view(&self) -> SessionView {
        let gate = self.gate.state();
        let analysis = match &self.analysis {
            AnalysisPhase::Idle => AnalysisView::Idle,
            AnalysisPhase::Pending => AnalysisView::Pending,
            AnalysisPhase::Failed(message) => AnalysisView::Failed {
                message: message.clone(),
            },
            AnalysisPhase::Ready(full) => AnalysisView::Ready {
                went_well: full.analysis.went_well.clone(),
                could_have_gone_better: full.analysis.could_have_gone_better.clone(),
                conclusion: gate.unlocked.then(|| full.analysis.conclusion.clone()),
                overthinking_scenarios: full.overthinking_scenarios.clone(),
                went_well_image: full.went_well_image.clone(),
                could_have_gone_better_image: full.could_have_gone_better_image.clone(),
            },
        };

        SessionView {
            id: self.id,
            video_mime: self.video.as_ref().map(|v| v.mime().to_string()),
            analysis,
            gate,
            scenario1: self.scenario1.clone(),
            scenario2: self.scenario2.clone(),
        }
    }
}

/// Analysis as shown to the user; the conclusion stays hidden until unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AnalysisView {
    /// No analysis requested
    Idle,
    /// Analysis running
    Pending,
    /// Analysis failed
    Failed {
        /// Why it failed
        message: String,
    },
    /// Analysis available
    #[serde(rename_all = "camelCase")]
    Ready {
        /// What went well
        went_well: Section,
        /// What could have gone better
        could_have_gone_better: Section,
        /// The punchline, once both panels were viewed
        conclusion: Option<String>,
        /// Alternate scenarios
        overthinking_scenarios: ScenarioPair,
        /// Eager illustration of the "went well" section
        #[serde(skip_serializing_if = "Option::is_none")]
        went_well_image: Option<MediaPayload>,
        /// Eager illustration of the "could have gone better" section
        #[serde(skip_serializing_if = "Option::is_none")]
        could_have_gone_better_image: Option<MediaPayload>,
    },
}

/// Serialisable snapshot of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Session id
    pub id: SessionId,
    /// MIME type of the selected video
    pub video_mime: Option<String>,
    /// Analysis state
    pub analysis: AnalysisView,
    /// Unlock gate flags
    pub gate: GateState,
    /// Media for the first scenario
    pub scenario1: MediaState,
    /// Media for the second scenario
    pub scenario2: MediaState,
}
