//! Overthink: upload a video, get a witty analysis.
//!
//! Gemini extracts the events of an uploaded video, writes a three-part
//! analysis (what went well, what could have gone better, and a conclusion
//! that stays hidden until both other panels are viewed), and imagines two
//! overthinking scenarios. Images or short videos of each scenario are
//! generated on demand.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use overthink::{GeminiClient, Orchestrator, OverthinkConfig, VideoAsset};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OverthinkConfig::load()?;
//! let client = Arc::new(GeminiClient::new(&config)?);
//! let orchestrator = Orchestrator::new(
//!     client.clone(),
//!     client,
//!     &config.models,
//!     config.pipeline.clone(),
//! );
//!
//! let video = VideoAsset::from_bytes("video/mp4", &std::fs::read("day.mp4")?)?;
//! let analysis = orchestrator.analyze(&video).await?;
//! println!("{}", analysis.analysis.went_well.main);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `overthink_error` - error kinds with call-site tracking
//! - `overthink_core` - media payloads, events, analysis, requests
//! - `overthink_interface` - provider and prompt-flow traits
//! - `overthink_rate_limit` - tiers, limiter, configuration
//! - `overthink_models` - Gemini REST client
//! - `overthink_pipeline` - prompt flows and the orchestrator
//! - `overthink_session` - session records and the unlock gate
//! - `overthink_server` - HTTP routes
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod observability;

pub use overthink_core::*;
pub use overthink_error::*;
pub use overthink_interface::*;
pub use overthink_models::{GeminiClient, GeminiResult};
pub use overthink_pipeline::*;
pub use overthink_rate_limit::*;
pub use overthink_server::{ApiError, AppState, router, serve, state_from_config};
pub use overthink_session::*;
