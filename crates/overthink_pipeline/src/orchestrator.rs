//! Sequencing of the prompt flows for one user action.

use crate::{AnalysisFlow, ExtractionFlow, ImageFlow, ImageInput, InFlight, ScenarioFlow, VideoFlow};
use overthink_core::{
    AnalysisInput, FullAnalysis, GeneratedMedia, MediaSlot, VideoAsset,
};
use overthink_error::{FlowError, FlowErrorKind, Stage};
use overthink_interface::{GenerativeDriver, PromptFlow, VideoGeneration};
use overthink_rate_limit::{AnalysisInputMode, ModelsConfig, PipelineConfig, ScenarioMediaMode};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Runs the pipeline.
///
/// No stage is retried: a failed `analyze` has to be re-run from the start.
pub struct Orchestrator {
    extraction: ExtractionFlow,
    analysis: AnalysisFlow,
    scenarios: ScenarioFlow,
    image: ImageFlow,
    video: VideoFlow,
    config: PipelineConfig,
    in_flight: InFlight,
}

impl Orchestrator {
    /// Wire the five flows to their providers.
    pub fn new(
        driver: Arc<dyn GenerativeDriver>,
        video_backend: Arc<dyn VideoGeneration>,
        models: &ModelsConfig,
        config: PipelineConfig,
    ) -> Self {
        Self {
            extraction: ExtractionFlow::new(Arc::clone(&driver), models.text().clone()),
            analysis: AnalysisFlow::new(
                Arc::clone(&driver),
                models.text().clone(),
                config.analysis_variant,
            ),
            scenarios: ScenarioFlow::new(Arc::clone(&driver), models.text().clone()),
            image: ImageFlow::new(driver, models.image().clone()),
            video: VideoFlow::new(video_backend, config.video.clone()),
            config,
            in_flight: InFlight::default(),
        }
    }

    /// Pipeline switches in effect.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Slots with media generation in flight.
    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    fn analysis_input(&self, event_details: String) -> AnalysisInput {
        let outcome_details = match self.config.analysis_input {
            AnalysisInputMode::EventsOnly => None,
            AnalysisInputMode::EventsAndOutcome => Some(event_details.clone()),
        };
        AnalysisInput {
            event_details,
            outcome_details,
        }
    }

    /// Extract events, then analyze them and imagine alternatives.
    ///
    /// # Errors
    ///
    /// - `EmptyExtraction` when the video yields no usable events; nothing
    ///   else is called
    /// - `Generation` from whichever flow failed first; the other result
    ///   is discarded
    #[instrument(skip(self, video), fields(mime = %video.mime(), bytes = video.decoded_len()))]
    pub async fn analyze(&self, video: &VideoAsset) -> Result<FullAnalysis, FlowError> {
        let events = self.extraction.execute(video).await?;
        if events.is_blank() {
            warn!("Extraction produced no usable events");
            return Err(FlowError::new(FlowErrorKind::EmptyExtraction));
        }

        let event_details = events.joined();
        debug!(events = events.len(), "Running analysis and scenarios");
        let input = self.analysis_input(event_details.clone());

        let (analysis, scenarios) = tokio::try_join!(
            self.analysis.execute(&input),
            self.scenarios.execute(&event_details),
        )?;

        let (went_well_image, could_have_gone_better_image) = if self.config.eager_images {
            let went_well = ImageInput {
                prompt: analysis.went_well.main.clone(),
                video: video.clone(),
            };
            let could_have_gone_better = ImageInput {
                prompt: analysis.could_have_gone_better.main.clone(),
                video: video.clone(),
            };
            let (a, b) = tokio::try_join!(
                self.image.execute(&went_well),
                self.image.execute(&could_have_gone_better),
            )?;
            (Some(a.payload().clone()), Some(b.payload().clone()))
        } else {
            (None, None)
        };

        info!(eager_images = self.config.eager_images, "Analysis complete");
        Ok(FullAnalysis {
            analysis,
            overthinking_scenarios: scenarios,
            went_well_image,
            could_have_gone_better_image,
        })
    }

    /// Generate the configured media kind for one scenario slot.
    ///
    /// Image mode needs the uploaded video as `context`; video mode ignores it.
    ///
    /// # Errors
    ///
    /// `ScenarioBusy` if the slot already has a generation in flight, otherwise
    /// whatever the media flow reports.
    #[instrument(skip(self, prompt, context), fields(slot = %slot, mode = %self.config.scenario_media))]
    pub async fn generate_scenario_media(
        &self,
        slot: MediaSlot,
        prompt: &str,
        context: Option<&VideoAsset>,
    ) -> Result<GeneratedMedia, FlowError> {
        let _claim = self.in_flight.claim(slot)?;

        match self.config.scenario_media {
            ScenarioMediaMode::Image => {
                let video = context.ok_or_else(|| {
                    FlowError::generation(Stage::Image, "the uploaded video is required as reference")
                })?;
                self.image
                    .execute(&ImageInput {
                        prompt: prompt.to_string(),
                        video: video.clone(),
                    })
                    .await
            }
            ScenarioMediaMode::Video => self.video.execute(&prompt.to_string()).await,
        }
    }
}
