//! Strictly Mind Reader - Unified CLI
//!
//! Plays the mind-reading game in the terminal, or prints and decodes
//! its cards non-interactively.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use strictly_mindread::{AppConfig, Cli, Command, decode, render_cards, run_tui};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play => {
            initialize_file_tracing()?;
            let config = load_config(&cli.config)?;
            run_tui(config).await
        }
        Command::Cards { mode } => {
            initialize_stderr_tracing();
            let config = load_config(&cli.config)?;
            let mode = config.find_mode(&mode)?;
            print!("{}", render_cards(&mode));
            Ok(())
        }
        Command::Decode { mode, answers } => {
            initialize_stderr_tracing();
            let config = load_config(&cli.config)?;
            let mode = config.find_mode(&mode)?;
            let revealed = decode(mode, &answers)?;
            println!("{}", revealed.guess());
            Ok(())
        }
    }
}

#[instrument(skip(path), fields(path = %path.display()))]
fn load_config(path: &std::path::Path) -> Result<AppConfig> {
    let config = AppConfig::load(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    info!(mode_count = config.modes().len(), "Configuration ready");
    Ok(config)
}

/// Logs to a file so tracing output never draws over the game screen.
fn initialize_file_tracing() -> Result<()> {
    let log_file = std::fs::File::create("strictly_mindread_tui.log")
        .context("Failed to create log file")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_mindread=debug")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn initialize_stderr_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
