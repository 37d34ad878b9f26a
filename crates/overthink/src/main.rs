//! Overthink CLI binary.
//!
//! - Serve the HTTP API
//! - Analyze a local video file
//! - Generate scenario media from a local video

use clap::Parser;
use overthink::observability::{LoggingConfig, init_logging};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, analyze_file, generate_media, load_config, serve};

    // GEMINI_API_KEY may live in .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&LoggingConfig::from_env(cli.verbose, cli.json_logs))?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { host, port } => {
            serve(config, host, port).await?;
        }

        Commands::Analyze { file, mime } => {
            analyze_file(&config, &file, mime.as_deref()).await?;
        }

        Commands::Media {
            file,
            prompt,
            mime,
            mode,
        } => {
            generate_media(&config, &file, &prompt, mime.as_deref(), mode).await?;
        }
    }

    Ok(())
}
