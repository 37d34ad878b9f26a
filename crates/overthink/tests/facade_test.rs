//! Facade re-exports and logging setup.

use overthink::observability::{DEFAULT_FILTER, LoggingConfig, init_logging};
use overthink::{OverthinkConfig, ScenarioMediaMode, UnlockGate};
use std::io::Write;

#[test]
fn test_logging_installs_once() {
    let config = LoggingConfig {
        filter: DEFAULT_FILTER.to_string(),
        json_logs: true,
    };

    assert!(init_logging(&config).is_ok());
    assert!(init_logging(&config).is_err());
}

#[test]
fn test_invalid_filter_rejected() {
    let config = LoggingConfig {
        filter: "overthink=not_a_level".to_string(),
        json_logs: false,
    };

    assert!(init_logging(&config).is_err());
}

#[test]
fn test_config_file_overrides_pipeline() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "[pipeline]\nscenario_media = \"video\"\neager_images = true")?;

    let config = OverthinkConfig::from_file(file.path())?;

    assert_eq!(config.pipeline.scenario_media, ScenarioMediaMode::Video);
    assert!(config.pipeline.eager_images);
    // Untouched sections keep their bundled values
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.pipeline.video.max_polls, 60);
    Ok(())
}

#[test]
fn test_gate_reexported() {
    assert!(!UnlockGate::default().is_unlocked());
}
