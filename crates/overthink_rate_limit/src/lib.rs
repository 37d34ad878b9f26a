//! Rate limiting and configuration.
//!
//! Provider quotas are described by [`Tier`]s loaded from `overthink.toml`
//! and enforced by a [`RateLimiter`] per model. The same configuration file
//! carries the model ids, pipeline switches, and server settings, loaded
//! through [`OverthinkConfig::load`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;
mod tier;

pub use config::{
    AnalysisInputMode, AnalysisVariant, ModelTierConfig, ModelsConfig, OverthinkConfig,
    PipelineConfig, ProviderConfig, ScenarioMediaMode, ServerConfig, TierConfig, VideoSettings,
};
pub use limiter::{RateLimiter, RateLimiterGuard};
pub use tier::Tier;
