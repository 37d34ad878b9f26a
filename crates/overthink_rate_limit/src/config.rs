//! TOML configuration.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (`include_str!` of `overthink.toml`)
//! 2. `~/.config/overthink/overthink.toml`
//! 3. `./overthink.toml`

use crate::Tier;
use config::{Config, File, FileFormat};
use overthink_error::{ConfigError, ConfigErrorKind, OverthinkError, OverthinkResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../overthink.toml");

/// Model-specific rate limit overrides.
///
/// ```toml
/// [providers.gemini.tiers.free.models."veo-2.0-generate-001"]
/// rpm = 2
/// max_concurrent = 1
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ModelTierConfig {
    /// Requests per minute (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,

    /// Requests per day (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpd: Option<u32>,

    /// Maximum concurrent requests (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,
}

/// Configuration for a specific API tier.
///
/// `None` limits are unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TierConfig {
    /// Name of the tier (e.g., "Free")
    pub name: String,

    /// Requests per minute (tier-level default)
    #[serde(default)]
    pub rpm: Option<u32>,

    /// Requests per day (tier-level default)
    #[serde(default)]
    pub rpd: Option<u32>,

    /// Maximum concurrent requests (tier-level default)
    #[serde(default)]
    pub max_concurrent: Option<u32>,

    /// Model-specific overrides
    #[serde(default)]
    pub models: HashMap<String, ModelTierConfig>,
}

impl Tier for TierConfig {
    fn rpm(&self) -> Option<u32> {
        self.rpm
    }

    fn rpd(&self) -> Option<u32> {
        self.rpd
    }

    fn max_concurrent(&self) -> Option<u32> {
        self.max_concurrent
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TierConfig {
    /// Tier limits with the overrides for `model_name` applied.
    pub fn for_model(&self, model_name: &str) -> TierConfig {
        match self.models.get(model_name) {
            Some(model_config) => TierConfig {
                name: self.name.clone(),
                rpm: model_config.rpm.or(self.rpm),
                rpd: model_config.rpd.or(self.rpd),
                max_concurrent: model_config.max_concurrent.or(self.max_concurrent),
                models: HashMap::new(),
            },
            None => self.clone(),
        }
    }
}

/// Configuration for a specific provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Name of the default tier for this provider
    pub default_tier: String,

    /// Map of tier name to tier configuration
    pub tiers: HashMap<String, TierConfig>,
}

/// Provider endpoint and model ids.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, derive_getters::Getters)]
pub struct ModelsConfig {
    /// REST base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`
    base_url: String,
    /// Model for extraction, analysis, and scenarios
    text: String,
    /// Model for scenario and section images
    image: String,
    /// Model for scenario videos
    video: String,
}

impl ModelsConfig {
    /// Point every call at a different base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Which analysis prompt to use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnalysisVariant {
    /// Single take per section
    Plain,
    /// Primary and contrarian take per section
    #[default]
    DevilsAdvocate,
}

/// Which fields the analysis flow receives.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnalysisInputMode {
    /// Event text only
    #[default]
    EventsOnly,
    /// Event text sent as both event and outcome details
    EventsAndOutcome,
}

/// How on-demand scenario media is produced.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScenarioMediaMode {
    /// Image generated with the uploaded video as reference
    #[default]
    Image,
    /// Short video generated from the prompt alone
    Video,
}

/// Video job parameters and poll policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VideoSettings {
    /// Clip length in seconds
    pub duration_secs: u32,
    /// Aspect ratio, e.g. "16:9"
    pub aspect_ratio: String,
    /// Seconds between status checks
    pub poll_interval_secs: u64,
    /// Status checks before giving up
    pub max_polls: usize,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            duration_secs: 5,
            aspect_ratio: "16:9".to_string(),
            poll_interval_secs: 5,
            max_polls: 60,
        }
    }
}

/// Pipeline switches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct PipelineConfig {
    /// Analysis prompt variant
    #[serde(default)]
    pub analysis_variant: AnalysisVariant,
    /// Analysis input contract
    #[serde(default)]
    pub analysis_input: AnalysisInputMode,
    /// Generate section images as part of `analyze`
    #[serde(default)]
    pub eager_images: bool,
    /// On-demand scenario media
    #[serde(default)]
    pub scenario_media: ScenarioMediaMode,
    /// Video job settings
    #[serde(default)]
    pub video: VideoSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Largest accepted request body, which bounds uploaded videos
    pub max_upload_bytes: usize,
    /// Seconds a session may sit untouched before it is evicted
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// Live session cap; the least recently active is evicted past it
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_session_ttl_secs() -> u64 {
    60 * 60
}

fn default_max_sessions() -> usize {
    1_000
}

impl ServerConfig {
    /// Session idle TTL as a duration.
    pub fn session_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.session_ttl_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_upload_bytes: 50 * 1024 * 1024,
            session_ttl_secs: default_session_ttl_secs(),
            max_sessions: default_max_sessions(),
        }
    }
}

/// Top-level configuration.
///
/// # Example
///
/// ```no_run
/// use overthink_rate_limit::OverthinkConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = OverthinkConfig::load()?;
/// let tier = config.get_tier("gemini", None).unwrap();
/// println!("Gemini {} tier RPM: {:?}", tier.name, tier.rpm);
/// println!("Text model: {}", config.models.text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OverthinkConfig {
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Endpoint and model ids
    pub models: ModelsConfig,

    /// Pipeline switches
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl OverthinkConfig {
    /// Bundled defaults only, ignoring user files.
    #[instrument]
    pub fn bundled() -> OverthinkResult<Self> {
        debug!("Loading bundled configuration");
        Self::build(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Bundled defaults overridden by one specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the result cannot be parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> OverthinkResult<Self> {
        debug!("Loading configuration from file");

        Self::build(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from(path.as_ref())),
        )
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and skipped if not found.
    #[instrument]
    pub fn load() -> OverthinkResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/overthink/overthink.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("overthink").required(false));

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> OverthinkResult<Self> {
        builder
            .build()
            .map_err(|e| {
                OverthinkError::from(ConfigError::new(ConfigErrorKind::Build(e.to_string())))
            })?
            .try_deserialize()
            .map_err(|e| {
                OverthinkError::from(ConfigError::new(ConfigErrorKind::Parse(e.to_string())))
            })
    }

    /// Tier configuration for a provider, or its default tier when `tier_name` is `None`.
    #[instrument(skip(self))]
    pub fn get_tier(&self, provider: &str, tier_name: Option<&str>) -> Option<TierConfig> {
        let provider_config = self.providers.get(provider)?;

        let tier = tier_name.unwrap_or(&provider_config.default_tier);

        debug!(provider, tier, "Looking up tier configuration");

        provider_config.tiers.get(tier).cloned()
    }
}
