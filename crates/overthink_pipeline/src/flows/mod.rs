//! The five prompt flows.

mod analysis;
mod extract;
mod image;
mod scenarios;
mod video;

pub use analysis::AnalysisFlow;
pub use extract::ExtractionFlow;
pub use image::{ImageFlow, ImageInput};
pub use scenarios::ScenarioFlow;
pub use video::VideoFlow;

use overthink_core::{GenerateRequest, GenerateRequestBuilder};
use overthink_error::{FlowError, OverthinkError, Stage};

/// A provider call failed outright.
pub(crate) fn provider_failure(stage: Stage, err: &OverthinkError) -> FlowError {
    FlowError::generation(stage, err.message())
}

/// Finish a request builder, tagging failures with the stage.
pub(crate) fn build_request(
    stage: Stage,
    builder: &GenerateRequestBuilder,
) -> Result<GenerateRequest, FlowError> {
    builder
        .build()
        .map_err(|e| FlowError::generation(stage, format!("invalid request: {}", e)))
}
