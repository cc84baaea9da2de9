//! Command-line interface for strictly_mindread.

use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Mind Reader - guesses your number from yes/no answers
#[derive(Parser, Debug)]
#[command(name = "strictly_mindread")]
#[command(about = "Think of a number; I'll read your mind", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (defaults apply if it doesn't exist)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play the game in the terminal
    Play,

    /// Print every question card of a range
    Cards {
        /// Range label (e.g. "1 to 50") or 1-based position
        #[arg(short, long, default_value = "1")]
        mode: String,
    },

    /// Work out the number from a string of answers
    Decode {
        /// Range label (e.g. "1 to 50") or 1-based position
        #[arg(short, long, default_value = "1")]
        mode: String,

        /// One y/n per card, first card first (e.g. "ynynny")
        #[arg(short, long)]
        answers: String,
    },
}
