//! Core data types for the Overthink video analysis service.
//!
//! This crate holds the records every other crate passes around: media
//! payloads, extracted events, the witty analysis and its scenarios, and the
//! provider-neutral request/response types used by drivers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analysis;
mod events;
mod input;
mod media;
mod message;
mod output;
mod request;
mod role;
mod slot;

pub use analysis::{Analysis, AnalysisInput, FullAnalysis, Panel, ScenarioKey, ScenarioPair, Section};
pub use events::EventSummary;
pub use input::{Input, MediaSource};
pub use media::{GeneratedMedia, MediaKind, MediaPayload, VideoAsset};
pub use message::Message;
pub use output::Output;
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse, Modality};
pub use role::Role;
pub use slot::{MediaSlot, SessionId};
