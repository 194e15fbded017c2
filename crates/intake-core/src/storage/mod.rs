mod config;
pub mod artifacts;

pub use artifacts::ArtifactStore;
pub use config::{ArtifactFiles, Config, SimulationDefaults};

use std::path::PathBuf;

/// Returns `~/.config/intake[-dev]/` based on INTAKE_ENV.
///
/// Set INTAKE_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn config_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("INTAKE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("intake-dev")
    } else {
        base_dir.join("intake")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
