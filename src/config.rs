//! Application configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use strictly_bitguess::{GameMode, Preset};
use tracing::{debug, info, instrument, warn};

/// Environment variable overriding the analytics endpoint.
pub const BEACON_URL_ENV: &str = "STRICTLY_MINDREAD_BEACON_URL";

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "strictly_mindread.toml";

/// One selectable range as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ModeConfig {
    /// Label shown on the start screen.
    label: String,
    /// Largest number the player may pick.
    max_num: u32,
    /// Question count; derived from `max_num` when omitted.
    #[serde(default)]
    max_bits: Option<u32>,
}

impl ModeConfig {
    /// Validates this entry into a playable mode.
    #[instrument(skip(self), fields(label = %self.label))]
    pub fn to_mode(&self) -> Result<GameMode, ConfigError> {
        let mode = match self.max_bits {
            Some(bits) => GameMode::with_bits(&self.label, self.max_num, bits),
            None => GameMode::new(&self.label, self.max_num),
        };
        mode.map_err(|e| ConfigError::new(format!("Invalid mode '{}': {}", self.label, e)))
    }
}

impl From<&GameMode> for ModeConfig {
    fn from(mode: &GameMode) -> Self {
        Self {
            label: mode.label().clone(),
            max_num: *mode.max_num(),
            max_bits: Some(*mode.max_bits()),
        }
    }
}

/// Where round events are reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Endpoint receiving POSTed events; no beacon when absent.
    #[serde(default)]
    endpoint: Option<String>,
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Ranges offered on the start screen.
    #[serde(default = "default_modes")]
    modes: Vec<ModeConfig>,

    /// Index into `modes` selected at launch.
    #[serde(default)]
    default_mode: usize,

    /// How long the screen flashes after an answer, in milliseconds.
    #[serde(default = "default_flash_millis")]
    flash_millis: u64,

    /// Analytics beacon settings.
    #[serde(default)]
    analytics: AnalyticsConfig,
}

#[instrument]
fn default_modes() -> Vec<ModeConfig> {
    Preset::modes().iter().map(ModeConfig::from).collect()
}

#[instrument]
fn default_flash_millis() -> u64 {
    400
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            modes: default_modes(),
            default_mode: 0,
            flash_millis: default_flash_millis(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parses configuration from TOML text.
    #[instrument(skip(content), fields(len = content.len()))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(mode_count = config.modes.len(), "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to defaults, then
    /// applies environment overrides.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };

        Ok(config.with_beacon_override(std::env::var(BEACON_URL_ENV).ok()))
    }

    /// Applies the value of [`BEACON_URL_ENV`], if set.
    ///
    /// A blank value turns the beacon off.
    #[instrument(skip(self, url), fields(set = url.is_some()))]
    pub fn with_beacon_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            info!(env = BEACON_URL_ENV, "Overriding analytics endpoint from environment");
            let url = url.trim().to_string();
            self.analytics.endpoint = (!url.is_empty()).then_some(url);
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.modes.is_empty() {
            return Err(ConfigError::new("At least one mode must be configured"));
        }
        if self.default_mode >= self.modes.len() {
            warn!(
                default_mode = self.default_mode,
                mode_count = self.modes.len(),
                "default_mode out of range"
            );
            return Err(ConfigError::new(format!(
                "default_mode {} out of range (have {} modes)",
                self.default_mode,
                self.modes.len()
            )));
        }
        for mode in &self.modes {
            mode.to_mode()?;
        }
        Ok(())
    }

    /// All configured modes, validated.
    #[instrument(skip(self))]
    pub fn game_modes(&self) -> Result<Vec<GameMode>, ConfigError> {
        self.modes.iter().map(ModeConfig::to_mode).collect()
    }

    /// Finds a mode by label (case-insensitive) or 1-based position.
    #[instrument(skip(self))]
    pub fn find_mode(&self, key: &str) -> Result<GameMode, ConfigError> {
        let modes = self.game_modes()?;
        if let Ok(position) = key.trim().parse::<usize>()
            && (1..=modes.len()).contains(&position)
        {
            return Ok(modes[position - 1].clone());
        }
        modes
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(key.trim()))
            .ok_or_else(|| ConfigError::new(format!("No mode named '{}'", key)))
    }

    /// Flash duration as a [`Duration`].
    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_millis)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
