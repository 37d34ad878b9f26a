//! Error types for the Overthink workspace.
//!
//! # Error Hierarchy
//!
//! Every concern follows the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind and records where it was created
//! - constructors use `#[track_caller]` so the location is captured for free
//!
//! [`OverthinkError`] aggregates all of them for callers that only need one
//! error type.
//!
//! # Examples
//!
//! ```
//! use overthink_error::{OverthinkResult, SessionError, SessionErrorKind};
//!
//! fn begin_analysis(has_video: bool) -> OverthinkResult<()> {
//!     if !has_video {
//!         Err(SessionError::new(SessionErrorKind::NoVideo))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(begin_analysis(false).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod flow;
mod gemini;
mod media;
mod server;
mod session;

pub use config::{ConfigError, ConfigErrorKind};
pub use error::{OverthinkError, OverthinkErrorKind, OverthinkResult};
pub use flow::{FlowError, FlowErrorKind, Stage};
pub use gemini::{GeminiError, GeminiErrorKind};
pub use media::{MediaError, MediaErrorKind};
pub use server::{ServerError, ServerErrorKind};
pub use session::{SessionError, SessionErrorKind};
