//! Pipeline error taxonomy.
//!
//! Errors are organised by pipeline stage rather than by the type of the
//! underlying failure: callers surface one human-readable message per
//! operation, and the stage tells the user which step gave up.

/// A step of the analysis pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display,
)]
pub enum Stage {
    /// Event extraction from the uploaded video
    #[display("Event extraction")]
    Extraction,
    /// Witty analysis of the extracted events
    #[display("Analysis")]
    Analysis,
    /// Alternate "overthinking" scenarios
    #[display("Scenario")]
    Scenarios,
    /// Image generation for a scenario or section
    #[display("Image")]
    Image,
    /// Short video generation for a scenario
    #[display("Video")]
    Video,
}

/// Pipeline failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum FlowErrorKind {
    /// Extraction produced no usable text
    #[display("Could not extract any meaningful events from the video.")]
    EmptyExtraction,
    /// A provider call returned no usable output or an explicit error
    #[display("{} generation failed: {}", stage, message)]
    Generation {
        /// Stage whose provider call failed
        stage: Stage,
        /// What went wrong
        message: String,
    },
    /// The video job failed or its media could not be fetched
    #[display("Failed to retrieve generated media: {}", _0)]
    MediaRetrieval(String),
    /// The video job did not finish within the poll budget
    #[display("Video generation did not finish after {} polls ({}s)", attempts, waited_secs)]
    Timeout {
        /// Number of status checks made
        attempts: usize,
        /// Total seconds spent waiting between checks
        waited_secs: u64,
    },
    /// Media generation is already running for this slot
    #[display("Media generation already in progress for {}", _0)]
    ScenarioBusy(String),
}

/// Pipeline error with source location tracking.
///
/// # Examples
///
/// ```
/// use overthink_error::{FlowError, FlowErrorKind, Stage};
///
/// let err = FlowError::generation(Stage::Scenarios, "no candidates returned");
/// assert_eq!(err.stage(), Some(Stage::Scenarios));
/// assert!(err.kind.to_string().starts_with("Scenario generation failed"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Flow Error: {} at line {} in {}", kind, line, file)]
pub struct FlowError {
    /// The kind of error that occurred
    pub kind: FlowErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl FlowError {
    /// Create a new FlowError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: FlowErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a [`FlowErrorKind::Generation`] error.
    #[track_caller]
    pub fn generation(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(FlowErrorKind::Generation {
            stage,
            message: message.into(),
        })
    }

    /// Shorthand for a [`FlowErrorKind::MediaRetrieval`] error.
    #[track_caller]
    pub fn media_retrieval(message: impl Into<String>) -> Self {
        Self::new(FlowErrorKind::MediaRetrieval(message.into()))
    }

    /// Stage that failed, when the error is stage specific.
    pub fn stage(&self) -> Option<Stage> {
        match &self.kind {
            FlowErrorKind::EmptyExtraction => Some(Stage::Extraction),
            FlowErrorKind::Generation { stage, .. } => Some(*stage),
            FlowErrorKind::MediaRetrieval(_) | FlowErrorKind::Timeout { .. } => Some(Stage::Video),
            FlowErrorKind::ScenarioBusy(_) => None,
        }
    }

    /// Message suitable for showing to an end user verbatim.
    pub fn user_message(&self) -> String {
        self.kind.to_string()
    }
}
