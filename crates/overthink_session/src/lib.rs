//! Per-upload session state for Overthink.
//!
//! A session holds the selected video, the latest analysis, the two scenario
//! media slots, and the [`UnlockGate`] that hides the conclusion until both
//! evaluative panels have been viewed.
//!
//! Long-running work happens outside the store: callers take a ticket with
//! `begin_*`, run the pipeline without holding any lock, and hand the result
//! back with `complete_*`. Each ticket carries the session epoch it was issued
//! under, so a result that belongs to a replaced video or analysis is dropped
//! instead of merged.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gate;
mod session;
mod store;

pub use gate::{GateState, GateUpdate, UnlockGate, UnlockNotice};
pub use session::{AnalysisPhase, AnalysisView, MediaState, Session, SessionView};
pub use store::{AnalysisTicket, DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL, MediaTicket, SessionStore};
