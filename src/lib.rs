// svifpod - view in-memory images of a Python/OpenCV debug session
//
// The host editor owns the debug session and the DAP transport. This crate
// taps into the host's tracker hooks, follows the inspected frame and turns
// array variables into PNG files the editor can open.

pub mod adapter;
pub mod config;
pub mod dap;
pub mod debounce;
pub mod error;
pub mod export;
pub mod extension;
pub mod host;
pub mod replay;
pub mod session;
pub mod watch;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

pub use config::Config;
pub use error::{ViewerError, ViewerResult};
pub use extension::Extension;

#[derive(Parser, Debug)]
#[command(name = "svifpod", version, about = "Replay DAP transcripts through the image viewer tracker")]
struct Args {
    /// Configuration file (defaults to <config dir>/svifpod/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Feed a JSON-lines DAP transcript through a tracker and print the result
    Replay {
        transcript: PathBuf,
        /// Session id to report under
        #[arg(long, default_value = "replay")]
        session: String,
        /// Patch `variables` responses with the image viewer context
        #[arg(long)]
        add_view_context: bool,
    },
    /// Empty the image scratch directory
    Clean,
}

/// CLI entry point
pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match args.command {
        CliCommand::Replay {
            transcript,
            session,
            add_view_context,
        } => {
            if add_view_context {
                config.add_view_context_entry_to_debug_variables = true;
            }
            let content = std::fs::read_to_string(&transcript)
                .with_context(|| format!("reading {}", transcript.display()))?;
            let entries = replay::parse_transcript(&content)?;

            let runtime = tokio::runtime::Runtime::new()?;
            let report = runtime.block_on(async {
                let extension = Extension::activate(config, Arc::new(replay::LoggingWatchView))?;
                replay::replay(&extension, &session, entries).await
            })?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        CliCommand::Clean => {
            let scratch = export::ScratchDir::prepare(&config.working_dir_name)?;
            println!("{}", scratch.path().display());
        }
    }

    Ok(())
}
