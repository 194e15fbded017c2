use std::path::PathBuf;

use intake_core::storage::ArtifactStore;
use intake_core::Config;

/// Resolve the artifact store: an explicit `--data-dir` bypasses the
/// config file entirely.
pub fn store_for(data_dir: Option<PathBuf>) -> Result<ArtifactStore, Box<dyn std::error::Error>> {
    match data_dir {
        Some(dir) => Ok(ArtifactStore::with_dir(dir)),
        None => {
            let config = Config::load_or_default();
            Ok(ArtifactStore::from_config(&config)?)
        }
    }
}

/// Print a diagnostics one-liner when a stage degraded anything.
pub fn report_diagnostics(diagnostics: &intake_core::Diagnostics) {
    if !diagnostics.is_clean() {
        println!(
            "{} degraded case(s) recorded; see the diagnostics artifact",
            diagnostics.total()
        );
    }
}
