//! Request and response types for generation.

use crate::{MediaPayload, Message, Output};
use serde::{Deserialize, Serialize};

/// Response modalities a request may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    /// Text parts
    #[display("TEXT")]
    Text,
    /// Inline image parts
    #[display("IMAGE")]
    Image,
}

/// Generic generation request (multimodal-safe).
///
/// # Examples
///
/// ```
/// use overthink_core::{GenerateRequest, Input, Message, Modality};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::user(vec![Input::Text("Hello!".to_string())])])
///     .response_modalities(vec![Modality::Text, Modality::Image])
///     .model("gemini-2.0-flash")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages.len(), 1);
/// assert_eq!(request.model.as_deref(), Some("gemini-2.0-flash"));
/// assert_eq!(request.temperature, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, derive_builder::Builder)]
#[builder(setter(into), default)]
pub struct GenerateRequest {
    /// The messages to send
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    #[builder(setter(into, strip_option))]
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 2.0)
    #[builder(setter(into, strip_option))]
    pub temperature: Option<f32>,
    /// Model identifier to use; drivers fall back to their default
    #[builder(setter(into, strip_option))]
    pub model: Option<String>,
    /// Requested output modalities; empty means provider default
    pub response_modalities: Vec<Modality>,
    /// Requested MIME type for text output, e.g. `application/json`
    #[builder(setter(into, strip_option))]
    pub response_mime_type: Option<String>,
}

impl GenerateRequest {
    /// Creates a new request builder.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use overthink_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse {
///     outputs: vec![
///         Output::Text("Here you go: ".to_string()),
///         Output::Image { mime: Some("image/png".to_string()), data: vec![1, 2, 3] },
///         Output::Text("enjoy".to_string()),
///     ],
/// };
///
/// assert_eq!(response.text(), "Here you go: enjoy");
/// assert_eq!(response.first_image().unwrap().mime(), "image/png");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Concatenated text outputs.
    pub fn text(&self) -> String {
        self.outputs
            .iter()
            .filter_map(|output| match output {
                Output::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// First inline image, re-encoded as a media payload.
    pub fn first_image(&self) -> Option<MediaPayload> {
        self.outputs.iter().find_map(|output| match output {
            Output::Image { mime, data } if !data.is_empty() => Some(MediaPayload::from_bytes(
                mime.as_deref().unwrap_or("image/png"),
                data,
            )),
            _ => None,
        })
    }
}
