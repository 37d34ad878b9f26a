//! Command-line interface for the overthink binary.

mod commands;
mod run;

pub use commands::{Cli, Commands, MediaMode};
pub use run::{analyze_file, generate_media, load_config, serve};
