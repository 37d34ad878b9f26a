//! Command handlers.

use overthink_core::{MediaSlot, ScenarioKey, SessionId, VideoAsset};
use overthink_models::GeminiClient;
use overthink_pipeline::Orchestrator;
use overthink_rate_limit::{OverthinkConfig, PipelineConfig};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Bundled and user configuration, plus `path` if given.
pub fn load_config(path: Option<&Path>) -> CliResult<OverthinkConfig> {
    let config = match path {
        Some(path) => OverthinkConfig::from_file(path)?,
        None => OverthinkConfig::load()?,
    };
    Ok(config)
}

/// MIME type for a video file from its extension.
pub(crate) fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        "mov" => Some("video/quicktime"),
        "mpeg" | "mpg" => Some("video/mpeg"),
        "avi" => Some("video/x-msvideo"),
        "3gp" => Some("video/3gpp"),
        _ => None,
    }
}

async fn read_video(path: &Path, mime: Option<&str>) -> CliResult<VideoAsset> {
    let mime = match mime {
        Some(mime) => mime.to_string(),
        None => guess_mime(path)
            .ok_or_else(|| format!("Cannot guess the video type of {}; pass --mime", path.display()))?
            .to_string(),
    };
    let bytes = tokio::fs::read(path).await?;
    info!(path = %path.display(), %mime, bytes = bytes.len(), "Video loaded");
    Ok(VideoAsset::from_bytes(mime, &bytes)?)
}

fn orchestrator(config: &OverthinkConfig, pipeline: PipelineConfig) -> CliResult<Orchestrator> {
    let client = Arc::new(GeminiClient::new(config)?);
    Ok(Orchestrator::new(client.clone(), client, &config.models, pipeline))
}

/// `overthink serve`
pub async fn serve(
    mut config: OverthinkConfig,
    host: Option<String>,
    port: Option<u16>,
) -> CliResult<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    overthink_server::serve(config).await?;
    Ok(())
}

/// `overthink analyze`
pub async fn analyze_file(config: &OverthinkConfig, file: &Path, mime: Option<&str>) -> CliResult<()> {
    let video = read_video(file, mime).await?;
    let orchestrator = orchestrator(config, config.pipeline.clone())?;

    let analysis = orchestrator.analyze(&video).await?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

/// `overthink media`
pub async fn generate_media(
    config: &OverthinkConfig,
    file: &Path,
    prompt: &str,
    mime: Option<&str>,
    mode: Option<crate::cli::MediaMode>,
) -> CliResult<()> {
    let video = read_video(file, mime).await?;
    let mut pipeline = config.pipeline.clone();
    if let Some(mode) = mode {
        pipeline.scenario_media = mode.into();
    }
    let orchestrator = orchestrator(config, pipeline)?;

    let slot = MediaSlot::new(SessionId::new(), ScenarioKey::Scenario1);
    let media = orchestrator
        .generate_scenario_media(slot, prompt, Some(&video))
        .await?;
    println!("{}", media.data_uri());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_common_video_types() {
        assert_eq!(guess_mime(Path::new("day.MP4")), Some("video/mp4"));
        assert_eq!(guess_mime(Path::new("clip.webm")), Some("video/webm"));
        assert_eq!(guess_mime(Path::new("notes.txt")), None);
        assert_eq!(guess_mime(Path::new("no_extension")), None);
    }
}
