//! Top-level error wrapper types.

use crate::{ConfigError, FlowError, GeminiError, MediaError, ServerError, SessionError};

/// Every error condition in the workspace, by concern.
///
/// # Examples
///
/// ```
/// use overthink_error::{MediaError, MediaErrorKind, OverthinkError, OverthinkErrorKind};
///
/// let err: OverthinkError = MediaError::new(MediaErrorKind::EmptyPayload).into();
/// assert!(matches!(err.kind(), OverthinkErrorKind::Media(_)));
/// assert!(format!("{}", err).contains("Media payload is empty"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum OverthinkErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Media payload error
    #[from(MediaError)]
    Media(MediaError),
    /// Gemini provider error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Pipeline error
    #[from(FlowError)]
    Flow(FlowError),
    /// Session error
    #[from(SessionError)]
    Session(SessionError),
    /// HTTP server lifecycle error
    #[from(ServerError)]
    Server(ServerError),
}

/// Overthink error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Overthink Error: {}", _0)]
pub struct OverthinkError(Box<OverthinkErrorKind>);

impl OverthinkError {
    /// Create a new error from a kind.
    pub fn new(kind: OverthinkErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &OverthinkErrorKind {
        &self.0
    }

    /// The underlying condition without location details, for end users.
    ///
    /// # Examples
    ///
    /// ```
    /// use overthink_error::{GeminiError, GeminiErrorKind, OverthinkError};
    ///
    /// let err: OverthinkError = GeminiError::new(GeminiErrorKind::HttpError {
    ///     status_code: 429,
    ///     message: "Resource exhausted".to_string(),
    /// })
    /// .into();
    /// assert_eq!(err.message(), "HTTP 429 error: Resource exhausted");
    /// ```
    pub fn message(&self) -> String {
        match self.kind() {
            OverthinkErrorKind::Config(e) => e.kind.to_string(),
            OverthinkErrorKind::Media(e) => e.kind.to_string(),
            OverthinkErrorKind::Gemini(e) => e.kind.to_string(),
            OverthinkErrorKind::Flow(e) => e.kind.to_string(),
            OverthinkErrorKind::Session(e) => e.kind.to_string(),
            OverthinkErrorKind::Server(e) => e.kind.to_string(),
        }
    }
}

// Generic From implementation for any type that converts to OverthinkErrorKind
impl<T> From<T> for OverthinkError
where
    T: Into<OverthinkErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Overthink operations.
///
/// # Examples
///
/// ```
/// use overthink_error::{ConfigError, ConfigErrorKind, OverthinkResult};
///
/// fn might_fail() -> OverthinkResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::Build("overthink.toml is not valid TOML".to_string())))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
pub type OverthinkResult<T> = std::result::Result<T, OverthinkError>;
