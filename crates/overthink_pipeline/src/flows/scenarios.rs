//! Two alternate "what if" scenarios.

use super::{build_request, provider_failure};
use crate::{parse_json, prompts};
use async_trait::async_trait;
use overthink_core::{GenerateRequest, Input, Message, ScenarioPair};
use overthink_error::{FlowError, Stage};
use overthink_interface::{GenerativeDriver, PromptFlow};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Produces two overthinking scenarios from the event text.
pub struct ScenarioFlow {
    driver: Arc<dyn GenerativeDriver>,
    model: String,
}

impl ScenarioFlow {
    /// Flow using `model` on `driver`.
    pub fn new(driver: Arc<dyn GenerativeDriver>, model: impl Into<String>) -> Self {
        Self {
            driver,
            model: model.into(),
        }
    }
}

#[async_trait]
impl PromptFlow for ScenarioFlow {
    type Input = String;
    type Output = ScenarioPair;

    fn stage(&self) -> Stage {
        Stage::Scenarios
    }

    #[instrument(skip(self, event_details), fields(stage = %Stage::Scenarios, model = %self.model))]
    async fn execute(&self, event_details: &String) -> Result<ScenarioPair, FlowError> {
        let request = build_request(
            Stage::Scenarios,
            GenerateRequest::builder()
                .messages(vec![Message::user(vec![Input::Text(prompts::scenarios(
                    event_details,
                ))])])
                .model(self.model.clone())
                .response_mime_type("application/json"),
        )?;

        let response = self
            .driver
            .generate(&request)
            .await
            .map_err(|e| provider_failure(Stage::Scenarios, &e))?;

        let pair: ScenarioPair = parse_json(Stage::Scenarios, &response.text())?;
        let pair = ScenarioPair {
            scenario1: pair.scenario1.trim().to_string(),
            scenario2: pair.scenario2.trim().to_string(),
        };

        if pair.scenario1.is_empty() || pair.scenario2.is_empty() {
            return Err(FlowError::generation(
                Stage::Scenarios,
                "reply contained a blank scenario",
            ));
        }
        if pair.scenario1 == pair.scenario2 {
            warn!("Both scenarios are identical");
        }

        Ok(pair)
    }
}
