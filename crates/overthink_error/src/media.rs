//! Media payload error types.

/// Reasons a self-describing media string can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MediaErrorKind {
    /// String does not start with `data:`
    #[display("Media payload must start with 'data:'")]
    MissingScheme,
    /// No `;base64,` separator after the MIME type
    #[display("Media payload must be base64 encoded ('data:<mime>;base64,<payload>')")]
    NotBase64,
    /// MIME type segment is empty
    #[display("Media payload has an empty MIME type")]
    EmptyMime,
    /// Payload segment is empty
    #[display("Media payload is empty")]
    EmptyPayload,
    /// Payload is not valid base64
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
    /// MIME type does not match the expected media family
    #[display("Expected {} media, got '{}'", expected, actual)]
    UnexpectedMime {
        /// Expected MIME family, e.g. "video"
        expected: &'static str,
        /// MIME type found in the payload
        actual: String,
    },
}

/// Media error with source location tracking.
///
/// # Examples
///
/// ```
/// use overthink_error::{MediaError, MediaErrorKind};
///
/// let err = MediaError::new(MediaErrorKind::MissingScheme);
/// assert!(format!("{}", err).contains("data:"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Media Error: {} at line {} in {}", kind, line, file)]
pub struct MediaError {
    /// The kind of error that occurred
    pub kind: MediaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MediaError {
    /// Create a new MediaError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MediaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
