//! Prompt flows and the orchestrator that sequences them.
//!
//! # Flows
//!
//! | Flow | Input | Output |
//! |---|---|---|
//! | [`ExtractionFlow`] | uploaded video | [`EventSummary`](overthink_core::EventSummary) |
//! | [`AnalysisFlow`] | event text | [`Analysis`](overthink_core::Analysis) |
//! | [`ScenarioFlow`] | event text | [`ScenarioPair`](overthink_core::ScenarioPair) |
//! | [`ImageFlow`] | scenario text + video | image [`GeneratedMedia`](overthink_core::GeneratedMedia) |
//! | [`VideoFlow`] | scenario text | video [`GeneratedMedia`](overthink_core::GeneratedMedia) |
//!
//! The [`Orchestrator`] runs extraction, then analysis and scenarios
//! concurrently, and serves on-demand scenario media with per-slot mutual
//! exclusion.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extraction;
mod flows;
mod in_flight;
mod orchestrator;
mod prompts;

pub use extraction::{extract_json, parse_json};
pub use flows::{AnalysisFlow, ExtractionFlow, ImageFlow, ImageInput, ScenarioFlow, VideoFlow};
pub use in_flight::{InFlight, InFlightGuard};
pub use orchestrator::Orchestrator;
