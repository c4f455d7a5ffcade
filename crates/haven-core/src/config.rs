//! Engine configuration.
//!
//! Reads `~/.config/haven/config.toml` when present; every field has a
//! default so the engine runs out of the box against a local endpoint.

use crate::error::{HavenError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_base_url() -> String {
    "http://127.0.0.1:1234".to_string()
}

fn default_model() -> String {
    "local-model".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    750
}

fn default_temperature_crisis() -> f32 {
    0.2
}

fn default_temperature_high_intensity() -> f32 {
    0.3
}

fn default_temperature_initial() -> f32 {
    0.5
}

fn default_temperature_baseline() -> f32 {
    0.4
}

/// Per-situation completion temperatures, overridable from the
/// `[temperature]` table of the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureTable {
    /// Crisis turns: most deterministic output
    #[serde(default = "default_temperature_crisis")]
    pub crisis: f32,
    /// High emotional intensity
    #[serde(default = "default_temperature_high_intensity")]
    pub high_intensity: f32,
    /// Initial contact
    #[serde(default = "default_temperature_initial")]
    pub initial: f32,
    /// Everything else
    #[serde(default = "default_temperature_baseline")]
    pub baseline: f32,
}

impl Default for TemperatureTable {
    fn default() -> Self {
        Self {
            crisis: default_temperature_crisis(),
            high_intensity: default_temperature_high_intensity(),
            initial: default_temperature_initial(),
            baseline: default_temperature_baseline(),
        }
    }
}

/// Engine configuration, loaded from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the OpenAI-compatible completion endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name passed through to the endpoint
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout for a single completion call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Token budget for a single completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-situation sampling temperatures
    #[serde(default)]
    pub temperature: TemperatureTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            max_tokens: default_max_tokens(),
            temperature: TemperatureTable::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from `~/.config/haven/config.toml`, falling
    /// back to defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| {
            HavenError::io(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                err
            ))
        })?;

        let config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Returns the path to the configuration file: `~/.config/haven/config.toml`
fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("haven").join("config.toml"))
}
