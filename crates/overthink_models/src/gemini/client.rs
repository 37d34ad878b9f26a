//! Gemini REST client.
//!
//! # Example
//!
//! ```no_run
//! use overthink_core::{GenerateRequest, Input, Message};
//! use overthink_interface::GenerativeDriver;
//! use overthink_models::GeminiClient;
//! use overthink_rate_limit::OverthinkConfig;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OverthinkConfig::load()?;
//! let client = GeminiClient::new(&config)?;
//!
//! let request = GenerateRequest::builder()
//!     .messages(vec![Message::user(vec![Input::Text("Hello".to_string())])])
//!     .build()?;
//! let response = client.generate(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

use super::GeminiResult;
use super::protocol::{
    Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, InlineDataPart, Part, TextPart,
};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use overthink_core::{GenerateRequest, GenerateResponse, Input, MediaSource, Output, Role};
use overthink_error::{GeminiError, GeminiErrorKind, OverthinkError, OverthinkResult};
use overthink_interface::GenerativeDriver;
use overthink_rate_limit::{OverthinkConfig, RateLimiter, Tier, TierConfig};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

/// Client for the Gemini REST API with per-model rate limiting.
///
/// - **Limiter pool**: one [`RateLimiter`] per model, created on first use
/// - **Model-specific limits**: each limiter gets its model's overrides from the tier
/// - **Thread-safe**: cheap to clone, clones share the pool
#[derive(Clone)]
pub struct GeminiClient {
    pub(super) http: reqwest::Client,
    pub(super) api_key: String,
    pub(super) base_url: String,
    /// Default model when `req.model` is None
    model_name: String,
    pub(super) video_model: String,
    base_tier: TierConfig,
    limiters: Arc<Mutex<HashMap<String, RateLimiter<TierConfig>>>>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .field("video_model", &self.video_model)
            .field("base_tier", &self.base_tier.name())
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client from configuration.
    ///
    /// Reads the API key from the `GEMINI_API_KEY` environment variable.
    #[instrument(name = "gemini_client_new", skip(config))]
    pub fn new(config: &OverthinkConfig) -> OverthinkResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| OverthinkError::from(GeminiError::new(GeminiErrorKind::MissingApiKey)))?;
        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key.
    #[instrument(name = "gemini_client_with_api_key", skip(api_key, config))]
    pub fn with_api_key(api_key: impl Into<String>, config: &OverthinkConfig) -> OverthinkResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiError::new(GeminiErrorKind::MissingApiKey).into());
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| GeminiError::new(GeminiErrorKind::ClientCreation(e.to_string())))?;

        let base_tier = config.get_tier("gemini", None).unwrap_or_else(|| {
            warn!("No Gemini tier configured, using built-in free tier limits");
            TierConfig {
                name: "Free".to_string(),
                rpm: Some(10),
                rpd: Some(250),
                max_concurrent: Some(1),
                models: HashMap::new(),
            }
        });

        debug!(
            base_url = %config.models.base_url(),
            text_model = %config.models.text(),
            video_model = %config.models.video(),
            tier = %base_tier.name(),
            "Gemini client configured"
        );

        Ok(Self {
            http,
            api_key,
            base_url: config.models.base_url().trim_end_matches('/').to_string(),
            model_name: config.models.text().to_string(),
            video_model: config.models.video().to_string(),
            base_tier,
            limiters: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Rate limiter for `model`, created with the model's tier overrides on first use.
    pub(super) async fn limiter_for(&self, model: &str) -> RateLimiter<TierConfig> {
        let mut limiters = self.limiters.lock().await;
        limiters
            .entry(model.to_string())
            .or_insert_with(|| {
                let tier = self.base_tier.for_model(model);
                debug!(model, rpm = ?tier.rpm(), rpd = ?tier.rpd(), "Creating rate limiter");
                RateLimiter::new(tier)
            })
            .clone()
    }

    /// `{base}/models/{model}:{method}`.
    fn model_url(&self, model: &str, method: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    /// Convert one input into a wire part.
    fn input_to_part(input: &Input) -> GeminiResult<Part> {
        match input {
            Input::Text(text) => Ok(Part::Text(TextPart { text: text.clone() })),
            Input::Image { mime, source } | Input::Video { mime, source } => {
                let mime_type = mime.clone().unwrap_or_else(|| match input {
                    Input::Video { .. } => "video/mp4".to_string(),
                    _ => "image/png".to_string(),
                });
                let data = match source {
                    MediaSource::Base64(data) => data.clone(),
                    MediaSource::Binary(bytes) => STANDARD.encode(bytes),
                    MediaSource::Url(url) => {
                        return Err(GeminiError::new(GeminiErrorKind::UnsupportedInput(format!(
                            "URL media sources are not supported inline: {}",
                            url
                        ))));
                    }
                };
                Ok(Part::InlineData(InlineDataPart {
                    inline_data: InlineData { mime_type, data },
                }))
            }
        }
    }

    /// Build the wire request, splitting system messages into the system instruction.
    fn build_request(req: &GenerateRequest) -> GeminiResult<GenerateContentRequest> {
        let mut contents = Vec::new();
        let mut system_parts = Vec::new();

        for msg in &req.messages {
            let parts = msg
                .content
                .iter()
                .map(Self::input_to_part)
                .collect::<GeminiResult<Vec<_>>>()?;
            match msg.role {
                Role::System => system_parts.extend(parts),
                Role::User => contents.push(Content {
                    role: Some("user".to_string()),
                    parts,
                }),
                Role::Assistant => contents.push(Content {
                    role: Some("model".to_string()),
                    parts,
                }),
            }
        }

        let system_instruction = (!system_parts.is_empty()).then(|| Content {
            role: None,
            parts: system_parts,
        });

        let modalities: Vec<String> = req
            .response_modalities
            .iter()
            .map(|m| m.to_string())
            .collect();

        let generation_config = GenerationConfig {
            max_output_tokens: req.max_tokens,
            temperature: req.temperature,
            response_modalities: (!modalities.is_empty()).then_some(modalities),
            response_mime_type: req.response_mime_type.clone(),
        };

        Ok(GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: Some(generation_config),
        })
    }

    /// Convert a wire response into provider-neutral outputs.
    fn convert_response(response: GenerateContentResponse) -> GeminiResult<GenerateResponse> {
        if response.candidates.is_empty() {
            if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(GeminiError::new(GeminiErrorKind::PromptBlocked(reason)));
            }
        }

        let mut outputs = Vec::new();
        let parts = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .unwrap_or_default();

        for part in parts {
            match part {
                Part::Text(TextPart { text }) => outputs.push(Output::Text(text)),
                Part::InlineData(InlineDataPart { inline_data }) => {
                    let data = STANDARD.decode(&inline_data.data).map_err(|e| {
                        GeminiError::new(GeminiErrorKind::ResponseDecode(format!(
                            "inline data is not valid base64: {}",
                            e
                        )))
                    })?;
                    let mime = Some(inline_data.mime_type.clone());
                    if inline_data.mime_type.starts_with("video/") {
                        outputs.push(Output::Video { mime, data });
                    } else {
                        outputs.push(Output::Image { mime, data });
                    }
                }
            }
        }

        Ok(GenerateResponse { outputs })
    }

    /// Map a non-2xx response into a Gemini error, preferring the provider's message.
    pub(super) async fn status_error(response: reqwest::Response) -> GeminiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or(body);

        GeminiError::new(GeminiErrorKind::HttpError {
            status_code: status.as_u16(),
            message,
        })
    }

    /// Send a request and decode the JSON body, mapping transport and status failures.
    pub(super) async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> GeminiResult<T> {
        let response = request
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ApiRequest(e.to_string())))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GeminiError::new(GeminiErrorKind::ResponseDecode(e.to_string())))
    }

    /// POST a JSON body to a model method.
    pub(super) async fn post_model<B: Serialize, T: DeserializeOwned>(
        &self,
        model: &str,
        method: &str,
        body: &B,
    ) -> GeminiResult<T> {
        let url = self.model_url(model, method);
        self.send_json(self.http.post(url).json(body)).await
    }

    #[instrument(
        name = "gemini_generate",
        skip(self, req),
        fields(
            model = %req.model.as_deref().unwrap_or(&self.model_name),
            messages = req.messages.len(),
        )
    )]
    async fn generate_internal(&self, req: &GenerateRequest) -> GeminiResult<GenerateResponse> {
        let model = req.model.as_deref().unwrap_or(&self.model_name);
        let body = Self::build_request(req)?;

        let limiter = self.limiter_for(model).await;
        let _guard = limiter.acquire().await;

        debug!("Sending generateContent request");
        let response: GenerateContentResponse =
            self.post_model(model, "generateContent", &body).await?;

        let converted = Self::convert_response(response)?;
        debug!(outputs = converted.outputs.len(), "Received generateContent response");
        Ok(converted)
    }
}

#[async_trait]
impl GenerativeDriver for GeminiClient {
    async fn generate(&self, req: &GenerateRequest) -> OverthinkResult<GenerateResponse> {
        Ok(self.generate_internal(req).await?)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
