//! Strictly Mind Reader - the mind-reading number game
//!
//! The player thinks of a number; the game shows one card per bit and
//! rebuilds the number from the yes/no answers.
//!
//! # Architecture
//!
//! - **Core**: [`strictly_bitguess`] holds the cards, answer accumulation and round typestate
//! - **Config**: ranges, flash timing and the analytics endpoint, from TOML
//! - **Telemetry**: fire-and-forget [`EventSink`]s
//! - **TUI**: ratatui front end driving an [`AnyRound`]
//!
//! # Example
//!
//! ```
//! use strictly_mindread::{AppConfig, decode};
//!
//! let config = AppConfig::default();
//! let mode = config.find_mode("1 to 50").unwrap();
//! let revealed = decode(mode, "ynynny").unwrap();
//! assert_eq!(revealed.guess().number(), Some(37));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod commands;
mod config;
mod telemetry;
mod tui;

// Crate-level exports - CLI
pub use cli::{Cli, Command};

// Crate-level exports - Subcommands
pub use commands::{DecodeError, decode, parse_answers, render_cards};

// Crate-level exports - Configuration
pub use config::{
    AnalyticsConfig, AppConfig, BEACON_URL_ENV, ConfigError, DEFAULT_CONFIG_FILE, ModeConfig,
};

// Crate-level exports - Telemetry
pub use telemetry::{
    BeaconPayload, EventSink, HttpBeacon, LogSink, NoopSink, RecordingSink, TrackedEvent, beacon_for,
    sink_for,
};

// Crate-level exports - Terminal UI
pub use tui::{Action, App, Control, Flash, action_for, run_tui};

// Crate-level exports - Game core
pub use strictly_bitguess::{
    Answer, AnyRound, Card, GameMode, Guess, GuessState, ModeError, Preset, RoundError,
    RoundPhase, generate_cards, record_answer,
};
