//! Configuration module for Deep-Research-RS
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable pointing at a settings file
pub const SETTINGS_PATH_ENV: &str = "DEEP_RESEARCH_SETTINGS_PATH";

/// Load settings from an explicit path, or search the default locations.
///
/// Environment overrides are applied last in every case.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        info!("Loading settings from: {}", path.display());
        let mut settings = Settings::from_file(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        settings.merge_env();
        return Ok(settings);
    }

    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return load(Some(&path));
        }
    }

    for path in default_paths() {
        if path.exists() {
            return load(Some(&path));
        }
    }

    info!("No settings file found, using defaults");
    let mut settings = Settings::default();
    settings.merge_env();
    Ok(settings)
}

fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/deep-research/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("deep-research-rs/settings.yml"));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "research:\n  max_depth: 1").unwrap();

        let settings = load(Some(file.path())).unwrap();
        assert_eq!(settings.research.max_depth, 1);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        assert!(load(Some(Path::new("/nonexistent/settings.yml"))).is_err());
    }
}
