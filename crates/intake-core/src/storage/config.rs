//! TOML-based application configuration.
//!
//! Holds the data directory and every artifact file name as injectable
//! values so no pipeline stage embeds a path literal. Stored at
//! `~/.config/intake/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::config_dir;
use crate::error::ConfigError;

/// File names for the JSON artifacts exchanged between pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactFiles {
    #[serde(default = "default_sheets_file")]
    pub sheets: String,
    #[serde(default = "default_questions_file")]
    pub questions: String,
    #[serde(default = "default_rules_file")]
    pub rules: String,
    #[serde(default = "default_modules_file")]
    pub modules: String,
    #[serde(default = "default_summary_file")]
    pub summary: String,
    #[serde(default = "default_schedule_file")]
    pub schedule: String,
    #[serde(default = "default_diagnostics_file")]
    pub diagnostics: String,
    /// Journey reports are written as `<prefix><persona>.json`.
    #[serde(default = "default_journey_prefix")]
    pub journey_prefix: String,
}

/// Simulation defaults applied when the caller passes nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationDefaults {
    #[serde(default = "default_persona")]
    pub default_persona: String,
    /// Fixed seed for reproducible runs; None draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/intake/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Directory holding all artifacts; defaults to `<config dir>/data`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub artifacts: ArtifactFiles,
    #[serde(default)]
    pub simulation: SimulationDefaults,
}

// Default functions
fn default_sheets_file() -> String {
    "sheets.json".to_string()
}
fn default_questions_file() -> String {
    "questions.json".to_string()
}
fn default_rules_file() -> String {
    "conditional_rules.json".to_string()
}
fn default_modules_file() -> String {
    "modules.json".to_string()
}
fn default_summary_file() -> String {
    "summary.json".to_string()
}
fn default_schedule_file() -> String {
    "14day_schedule.json".to_string()
}
fn default_diagnostics_file() -> String {
    "diagnostics.json".to_string()
}
fn default_journey_prefix() -> String {
    "journey_simulation_".to_string()
}
fn default_persona() -> String {
    "balanced".to_string()
}

impl Default for ArtifactFiles {
    fn default() -> Self {
        Self {
            sheets: default_sheets_file(),
            questions: default_questions_file(),
            rules: default_rules_file(),
            modules: default_modules_file(),
            summary: default_summary_file(),
            schedule: default_schedule_file(),
            diagnostics: default_diagnostics_file(),
            journey_prefix: default_journey_prefix(),
        }
    }
}

impl Default for SimulationDefaults {
    fn default() -> Self {
        Self {
            default_persona: default_persona(),
            seed: None,
        }
    }
}

impl Config {
    /// Location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = config_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/intake"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the default on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, falling back to defaults on any failure.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path().map_err(|e| ConfigError::SaveFailed {
            path: PathBuf::from("~/.config/intake"),
            message: e.to_string(),
        })?;
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// The directory artifacts live in: explicit `data_dir` or
    /// `<config dir>/data`.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let dir = config_dir()
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("~/.config/intake"),
                message: e.to_string(),
            })?
            .join("data");
        Ok(dir)
    }
}
