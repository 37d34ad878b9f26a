//! Event extraction from the uploaded video.

use super::{build_request, provider_failure};
use crate::{extract_json, prompts};
use async_trait::async_trait;
use overthink_core::{EventSummary, GenerateRequest, Input, Message, VideoAsset};
use overthink_error::{FlowError, Stage};
use overthink_interface::{GenerativeDriver, PromptFlow};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtractionReply {
    Wrapped {
        #[serde(rename = "eventsAndOutcomes")]
        events_and_outcomes: Vec<String>,
    },
    Bare(Vec<String>),
}

/// Asks the model for the key events and outcomes of a video.
///
/// A reply with text but no parseable JSON becomes a single general-summary
/// entry rather than a failure.
pub struct ExtractionFlow {
    driver: Arc<dyn GenerativeDriver>,
    model: String,
}

impl ExtractionFlow {
    /// Flow using `model` on `driver`.
    pub fn new(driver: Arc<dyn GenerativeDriver>, model: impl Into<String>) -> Self {
        Self {
            driver,
            model: model.into(),
        }
    }

    fn parse_reply(text: &str) -> EventSummary {
        let parsed = extract_json(text)
            .and_then(|json| serde_json::from_str::<ExtractionReply>(&json).ok());

        let events = match parsed {
            Some(ExtractionReply::Wrapped {
                events_and_outcomes,
            })
            | Some(ExtractionReply::Bare(events_and_outcomes)) => events_and_outcomes
                .into_iter()
                .map(|event| event.trim().to_string())
                .filter(|event| !event.is_empty())
                .collect(),
            None => {
                debug!("Extraction reply was not JSON, using it as a general summary");
                vec![text.trim().to_string()]
            }
        };

        EventSummary::new(events)
    }
}

#[async_trait]
impl PromptFlow for ExtractionFlow {
    type Input = VideoAsset;
    type Output = EventSummary;

    fn stage(&self) -> Stage {
        Stage::Extraction
    }

    #[instrument(skip(self, video), fields(stage = %Stage::Extraction, model = %self.model, mime = %video.mime()))]
    async fn execute(&self, video: &VideoAsset) -> Result<EventSummary, FlowError> {
        let request = build_request(
            Stage::Extraction,
            GenerateRequest::builder()
                .messages(vec![Message::user(vec![
                    Input::from(video),
                    Input::Text(prompts::extraction().to_string()),
                ])])
                .model(self.model.clone())
                .response_mime_type("application/json"),
        )?;

        let response = self
            .driver
            .generate(&request)
            .await
            .map_err(|e| provider_failure(Stage::Extraction, &e))?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(FlowError::generation(
                Stage::Extraction,
                "model returned no text",
            ));
        }

        let events = Self::parse_reply(&text);
        debug!(events = events.len(), "Extracted events");
        Ok(events)
    }
}
