//! Session error types.

/// Reasons a session operation is refused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SessionErrorKind {
    /// No session with the given id
    #[display("Session '{}' not found", _0)]
    NotFound(String),
    /// Analysis requested before a video was selected
    #[display("No video selected. Please select a video file to analyze.")]
    NoVideo,
    /// Operation needs a completed analysis
    #[display("No analysis available yet")]
    NoAnalysis,
    /// An analysis is already running for this session
    #[display("An analysis is already in progress")]
    AnalysisPending,
    /// Media generation is already running for the scenario
    #[display("Media generation already in progress for {}", _0)]
    MediaPending(String),
    /// A newer video or analysis replaced the one this result belongs to
    #[display("Result discarded: superseded by a newer request")]
    Superseded,
}

/// Session error with source location tracking.
///
/// # Examples
///
/// ```
/// use overthink_error::{SessionError, SessionErrorKind};
///
/// let err = SessionError::new(SessionErrorKind::NoVideo);
/// assert!(format!("{}", err).contains("No video selected"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Session Error: {} at line {} in {}", kind, line, file)]
pub struct SessionError {
    /// The kind of error that occurred
    pub kind: SessionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SessionError {
    /// Create a new SessionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SessionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
