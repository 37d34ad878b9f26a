//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use overthink_rate_limit::ScenarioMediaMode;
use std::path::PathBuf;

/// Overthink - a witty second opinion on your day, from a video
#[derive(Parser, Debug)]
#[command(name = "overthink")]
#[command(about = "Analyze a video with Gemini and overthink what happened", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the bundled defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Listen host (overrides `server.host`)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (overrides `server.port`)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Analyze a video file and print the result as JSON
    Analyze {
        /// Path to the video
        file: PathBuf,

        /// MIME type, guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,
    },

    /// Generate media for a scenario and print it as a data URI
    Media {
        /// Reference video
        file: PathBuf,

        /// Scenario text to illustrate
        #[arg(long)]
        prompt: String,

        /// MIME type of the video, guessed from the extension when omitted
        #[arg(long)]
        mime: Option<String>,

        /// Media kind (overrides `pipeline.scenario_media`)
        #[arg(long)]
        mode: Option<MediaMode>,
    },
}

/// Media kind selectable on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaMode {
    /// Still image using the video as reference
    Image,
    /// Short generated clip
    Video,
}

impl From<MediaMode> for ScenarioMediaMode {
    fn from(mode: MediaMode) -> Self {
        match mode {
            MediaMode::Image => ScenarioMediaMode::Image,
            MediaMode::Video => ScenarioMediaMode::Video,
        }
    }
}
