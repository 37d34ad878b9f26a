//! Witty three-section analysis.

use super::{build_request, provider_failure};
use crate::{parse_json, prompts};
use async_trait::async_trait;
use overthink_core::{Analysis, AnalysisInput, GenerateRequest, Input, Message, Panel};
use overthink_error::{FlowError, Stage};
use overthink_interface::{GenerativeDriver, PromptFlow};
use overthink_rate_limit::AnalysisVariant;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::instrument;

/// Produces the went-well / could-have-gone-better / conclusion analysis.
///
/// In the devil's-advocate variant both evaluative sections must carry a
/// non-blank contrarian take; in the plain variant any contrarian take the
/// model volunteers is dropped.
pub struct AnalysisFlow {
    driver: Arc<dyn GenerativeDriver>,
    model: String,
    variant: AnalysisVariant,
}

impl AnalysisFlow {
    /// Flow using `model` on `driver` with the given prompt variant.
    pub fn new(
        driver: Arc<dyn GenerativeDriver>,
        model: impl Into<String>,
        variant: AnalysisVariant,
    ) -> Self {
        Self {
            driver,
            model: model.into(),
            variant,
        }
    }

    /// Prompt variant in use.
    pub fn variant(&self) -> AnalysisVariant {
        self.variant
    }

    fn validate(&self, mut analysis: Analysis) -> Result<Analysis, FlowError> {
        for panel in Panel::iter() {
            if analysis.section(panel).main.trim().is_empty() {
                return Err(FlowError::generation(
                    Stage::Analysis,
                    format!("reply is missing the {} section", panel),
                ));
            }
        }
        if analysis.conclusion.trim().is_empty() {
            return Err(FlowError::generation(
                Stage::Analysis,
                "reply is missing the conclusion",
            ));
        }

        match self.variant {
            AnalysisVariant::DevilsAdvocate => {
                for panel in Panel::iter() {
                    if !analysis.section(panel).has_devils_advocate() {
                        return Err(FlowError::generation(
                            Stage::Analysis,
                            format!("reply is missing the devil's advocate take for {}", panel),
                        ));
                    }
                }
            }
            AnalysisVariant::Plain => {
                analysis.went_well.devils_advocate = None;
                analysis.could_have_gone_better.devils_advocate = None;
            }
        }

        Ok(analysis)
    }
}

#[async_trait]
impl PromptFlow for AnalysisFlow {
    type Input = AnalysisInput;
    type Output = Analysis;

    fn stage(&self) -> Stage {
        Stage::Analysis
    }

    #[instrument(skip(self, input), fields(stage = %Stage::Analysis, model = %self.model, variant = %self.variant))]
    async fn execute(&self, input: &AnalysisInput) -> Result<Analysis, FlowError> {
        let request = build_request(
            Stage::Analysis,
            GenerateRequest::builder()
                .messages(vec![Message::user(vec![Input::Text(prompts::analysis(
                    self.variant,
                    input,
                ))])])
                .model(self.model.clone())
                .response_mime_type("application/json"),
        )?;

        let response = self
            .driver
            .generate(&request)
            .await
            .map_err(|e| provider_failure(Stage::Analysis, &e))?;

        let analysis: Analysis = parse_json(Stage::Analysis, &response.text())?;
        self.validate(analysis)
    }
}
