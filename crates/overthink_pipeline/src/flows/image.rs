//! Scenario illustration using the uploaded video as reference.

use super::{build_request, provider_failure};
use crate::prompts;
use async_trait::async_trait;
use overthink_core::{GenerateRequest, GeneratedMedia, Input, Message, Modality, VideoAsset};
use overthink_error::{FlowError, Stage};
use overthink_interface::{GenerativeDriver, PromptFlow};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Input of the image flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// Scenario or section text to illustrate
    pub prompt: String,
    /// Uploaded video, for the people and setting
    pub video: VideoAsset,
}

/// Generates one image per call.
pub struct ImageFlow {
    driver: Arc<dyn GenerativeDriver>,
    model: String,
}

impl ImageFlow {
    /// Flow using the image-capable `model` on `driver`.
    pub fn new(driver: Arc<dyn GenerativeDriver>, model: impl Into<String>) -> Self {
        Self {
            driver,
            model: model.into(),
        }
    }
}

#[async_trait]
impl PromptFlow for ImageFlow {
    type Input = ImageInput;
    type Output = GeneratedMedia;

    fn stage(&self) -> Stage {
        Stage::Image
    }

    #[instrument(skip(self, input), fields(stage = %Stage::Image, model = %self.model))]
    async fn execute(&self, input: &ImageInput) -> Result<GeneratedMedia, FlowError> {
        if input.prompt.trim().is_empty() {
            return Err(FlowError::generation(Stage::Image, "nothing to illustrate"));
        }

        let request = build_request(
            Stage::Image,
            GenerateRequest::builder()
                .messages(vec![Message::user(vec![
                    Input::from(&input.video),
                    Input::Text(prompts::image(&input.prompt)),
                ])])
                .model(self.model.clone())
                .response_modalities(vec![Modality::Text, Modality::Image]),
        )?;

        let response = self
            .driver
            .generate(&request)
            .await
            .map_err(|e| provider_failure(Stage::Image, &e))?;

        let image = response.first_image().ok_or_else(|| {
            FlowError::generation(Stage::Image, "Image generation failed to return an image.")
        })?;

        debug!(mime = %image.mime(), bytes = image.decoded_len(), "Image generated");
        Ok(GeneratedMedia::image(image))
    }
}
