//! End-to-end pipeline behavior against scripted providers.

mod test_utils;

use overthink_core::{MediaSlot, ScenarioKey, SessionId};
use overthink_error::{FlowErrorKind, GeminiErrorKind, Stage};
use overthink_pipeline::Orchestrator;
use overthink_rate_limit::{AnalysisInputMode, AnalysisVariant, PipelineConfig, ScenarioMediaMode};
use std::sync::Arc;
use test_utils::{
    ANALYSIS, EXTRACTION, IMAGE, MockDriver, MockResponse, MockVideo, SCENARIOS, models,
    sample_video,
};

fn orchestrator(driver: &MockDriver, video: &MockVideo, config: PipelineConfig) -> Orchestrator {
    Orchestrator::new(
        Arc::new(driver.clone()),
        Arc::new(video.clone()),
        &models(),
        config,
    )
}

#[tokio::test]
async fn test_analyze_happy_path() -> anyhow::Result<()> {
    let driver = MockDriver::happy();
    let video = MockVideo::never_completing();
    let orchestrator = orchestrator(&driver, &video, PipelineConfig::default());

    let result = orchestrator.analyze(&sample_video()).await?;

    assert_eq!(result.analysis.went_well.main, "The talk landed.");
    assert_eq!(
        result.analysis.could_have_gone_better.devils_advocate.as_deref(),
        Some("Caffeine is overrated.")
    );
    assert_eq!(result.analysis.conclusion, "A day of triumph and stains.");
    assert_eq!(result.overthinking_scenarios.scenario1, "The coffee becomes sentient.");
    assert!(result.went_well_image.is_none());
    assert!(result.could_have_gone_better_image.is_none());

    // Extraction sees the video; later stages see the joined events
    let extraction = driver.calls_matching(EXTRACTION);
    assert_eq!(extraction.len(), 1);
    assert_eq!(extraction[0].videos, 1);
    for needle in [ANALYSIS, SCENARIOS] {
        let calls = driver.calls_matching(needle);
        assert_eq!(calls.len(), 1);
        assert!(calls[0].text.contains("Alice gave a talk\nBob spilled coffee"));
        assert_eq!(calls[0].videos, 0);
    }
    assert!(driver.calls_matching(IMAGE).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_analyze_serializes_camel_case() -> anyhow::Result<()> {
    let driver = MockDriver::happy();
    let orchestrator = orchestrator(&driver, &MockVideo::never_completing(), PipelineConfig::default());

    let result = orchestrator.analyze(&sample_video()).await?;
    let json = serde_json::to_value(&result)?;

    assert_eq!(json["wentWell"]["devilsAdvocate"], "Low bar, though.");
    assert_eq!(json["overthinkingScenarios"]["scenario2"], "Alice's slides are a prophecy.");
    assert!(json.get("conclusion").is_some());
    Ok(())
}

#[tokio::test]
async fn test_empty_extraction_stops_pipeline() {
    let driver = MockDriver::new()
        .on_text(EXTRACTION, r#"{"eventsAndOutcomes": ["  ", ""]}"#)
        .on_text(ANALYSIS, test_utils::ANALYSIS_REPLY)
        .on_text(SCENARIOS, test_utils::SCENARIOS_REPLY);
    let orchestrator = orchestrator(&driver, &MockVideo::never_completing(), PipelineConfig::default());

    let err = orchestrator.analyze(&sample_video()).await.unwrap_err();

    assert_eq!(err.kind, FlowErrorKind::EmptyExtraction);
    assert_eq!(
        err.user_message(),
        "Could not extract any meaningful events from the video."
    );
    assert_eq!(driver.call_count(), 1);
}

#[tokio::test]
async fn test_extraction_provider_error() {
    let driver = MockDriver::new().on(
        EXTRACTION,
        MockResponse::Error(GeminiErrorKind::HttpError {
            status_code: 500,
            message: "backend unavailable".to_string(),
        }),
    );
    let orchestrator = orchestrator(&driver, &MockVideo::never_completing(), PipelineConfig::default());

    let err = orchestrator.analyze(&sample_video()).await.unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Extraction));
    assert!(err.user_message().contains("backend unavailable"));
    assert_eq!(driver.call_count(), 1);
}

#[tokio::test]
async fn test_scenario_failure_fails_analyze() {
    let driver = MockDriver::new()
        .on_text(EXTRACTION, test_utils::EXTRACTION_REPLY)
        .on_text(ANALYSIS, test_utils::ANALYSIS_REPLY)
        .on_text(SCENARIOS, "I would rather not speculate.");
    let orchestrator = orchestrator(&driver, &MockVideo::never_completing(), PipelineConfig::default());

    let err = orchestrator.analyze(&sample_video()).await.unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Scenarios));
    assert!(err.user_message().starts_with("Scenario generation failed"));
}

#[tokio::test]
async fn test_devils_advocate_required() {
    let driver = MockDriver::new()
        .on_text(EXTRACTION, test_utils::EXTRACTION_REPLY)
        .on_text(
            ANALYSIS,
            r#"{"wentWell": {"main": "Fine."}, "couldHaveGoneBetter": {"main": "Coffee."}, "conclusion": "Meh."}"#,
        )
        .on_text(SCENARIOS, test_utils::SCENARIOS_REPLY);
    let orchestrator = orchestrator(&driver, &MockVideo::never_completing(), PipelineConfig::default());

    let err = orchestrator.analyze(&sample_video()).await.unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Analysis));
    assert!(err.user_message().contains("devil's advocate"));
}

#[tokio::test]
async fn test_plain_variant_drops_contrarian_takes() -> anyhow::Result<()> {
    let driver = MockDriver::happy();
    let config = PipelineConfig {
        analysis_variant: AnalysisVariant::Plain,
        ..PipelineConfig::default()
    };
    let orchestrator = orchestrator(&driver, &MockVideo::never_completing(), config);

    let result = orchestrator.analyze(&sample_video()).await?;

    assert!(result.analysis.went_well.devils_advocate.is_none());
    assert!(result.analysis.could_have_gone_better.devils_advocate.is_none());
    let prompt = &driver.calls_matching(ANALYSIS)[0].text;
    assert!(!prompt.contains("devil's advocate take"));
    Ok(())
}

#[tokio::test]
async fn test_events_and_outcome_input() -> anyhow::Result<()> {
    let driver = MockDriver::happy();
    let config = PipelineConfig {
        analysis_input: AnalysisInputMode::EventsAndOutcome,
        ..PipelineConfig::default()
    };
    let orchestrator = orchestrator(&driver, &MockVideo::never_completing(), config);

    orchestrator.analyze(&sample_video()).await?;

    let prompt = &driver.calls_matching(ANALYSIS)[0].text;
    assert!(prompt.contains("Event Details: Alice gave a talk"));
    assert!(prompt.contains("Outcome Details: Alice gave a talk"));
    Ok(())
}

#[tokio::test]
async fn test_eager_images() -> anyhow::Result<()> {
    let driver = MockDriver::happy();
    let config = PipelineConfig {
        eager_images: true,
        ..PipelineConfig::default()
    };
    let orchestrator = orchestrator(&driver, &MockVideo::never_completing(), config);

    let result = orchestrator.analyze(&sample_video()).await?;

    let went_well = result.went_well_image.expect("went well image");
    assert_eq!(went_well.mime(), "image/png");
    assert!(result.could_have_gone_better_image.is_some());

    let image_calls = driver.calls_matching(IMAGE);
    assert_eq!(image_calls.len(), 2);
    assert!(image_calls.iter().all(|c| c.videos == 1));
    assert!(image_calls.iter().any(|c| c.text.contains("The talk landed.")));
    assert!(image_calls.iter().any(|c| c.text.contains("The coffee.")));
    Ok(())
}

#[tokio::test]
async fn test_scenario_image_uses_video_context() -> anyhow::Result<()> {
    let driver = MockDriver::happy();
    let orchestrator = orchestrator(&driver, &MockVideo::never_completing(), PipelineConfig::default());
    let slot = MediaSlot::new(SessionId::new(), ScenarioKey::Scenario1);

    let media = orchestrator
        .generate_scenario_media(slot, "The coffee becomes sentient.", Some(&sample_video()))
        .await?;

    assert!(media.data_uri().starts_with("data:image/png;base64,"));
    let call = &driver.calls_matching(IMAGE)[0];
    assert!(call.text.contains("\"The coffee becomes sentient.\""));
    assert_eq!(call.model.as_deref(), Some(models().image().as_str()));
    assert!(!orchestrator.in_flight().is_busy(&slot));
    Ok(())
}

#[tokio::test]
async fn test_scenario_image_without_context() {
    let driver = MockDriver::happy();
    let orchestrator = orchestrator(&driver, &MockVideo::never_completing(), PipelineConfig::default());
    let slot = MediaSlot::new(SessionId::new(), ScenarioKey::Scenario2);

    let err = orchestrator
        .generate_scenario_media(slot, "Anything", None)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Image));
    assert_eq!(driver.call_count(), 0);
}

#[tokio::test]
async fn test_image_missing_from_reply() {
    let driver = MockDriver::new().on_text(IMAGE, "I can only describe it in words.");
    let orchestrator = orchestrator(&driver, &MockVideo::never_completing(), PipelineConfig::default());
    let slot = MediaSlot::new(SessionId::new(), ScenarioKey::Scenario1);

    let err = orchestrator
        .generate_scenario_media(slot, "A prophecy", Some(&sample_video()))
        .await
        .unwrap_err();

    assert!(err.user_message().contains("Image generation failed to return an image."));
    // Claim released after failure
    assert!(!orchestrator.in_flight().is_busy(&slot));
}

#[tokio::test]
async fn test_busy_slot_rejected_and_other_slot_free() -> anyhow::Result<()> {
    let driver = MockDriver::happy();
    let orchestrator = orchestrator(&driver, &MockVideo::never_completing(), PipelineConfig::default());
    let session = SessionId::new();
    let first = MediaSlot::new(session, ScenarioKey::Scenario1);
    let second = MediaSlot::new(session, ScenarioKey::Scenario2);

    let _held = orchestrator.in_flight().claim(first)?;

    let err = orchestrator
        .generate_scenario_media(first, "Busy", Some(&sample_video()))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, FlowErrorKind::ScenarioBusy(_)));
    assert!(driver.calls_matching(IMAGE).is_empty());

    orchestrator
        .generate_scenario_media(second, "Free", Some(&sample_video()))
        .await?;
    assert_eq!(driver.calls_matching(IMAGE).len(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_scenario_video_mode() -> anyhow::Result<()> {
    let driver = MockDriver::happy();
    let video = MockVideo::completing_after(2);
    let config = PipelineConfig {
        scenario_media: ScenarioMediaMode::Video,
        ..PipelineConfig::default()
    };
    let orchestrator = orchestrator(&driver, &video, config);
    let slot = MediaSlot::new(SessionId::new(), ScenarioKey::Scenario1);

    let media = orchestrator
        .generate_scenario_media(slot, "The coffee becomes sentient.", None)
        .await?;

    assert!(media.data_uri().starts_with("data:video/mp4;base64,"));
    assert_eq!(video.polls(), 2);
    assert_eq!(video.submitted()[0].prompt(), "The coffee becomes sentient.");
    assert_eq!(driver.call_count(), 0);
    Ok(())
}
