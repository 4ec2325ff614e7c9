//! Run artifacts written to the output directory

use crate::config::OutputSettings;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Locations of the three files a research run produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub directory: PathBuf,
    /// Raw sections in append order
    pub search_results: PathBuf,
    /// Sections with global citation numbering
    pub merged_results: PathBuf,
    pub report: PathBuf,
}

impl ArtifactPaths {
    pub fn from_settings(output: &OutputSettings) -> Self {
        Self {
            directory: output.directory.clone(),
            search_results: output.search_results_path(),
            merged_results: output.merged_results_path(),
            report: output.report_path(),
        }
    }

    fn all(&self) -> [&Path; 3] {
        [&self.search_results, &self.merged_results, &self.report]
    }

    /// Remove artifacts left by an earlier run and make sure the directory exists
    pub async fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.directory)
            .await
            .with_context(|| format!("failed to create {}", self.directory.display()))?;

        for path in self.all() {
            match fs::remove_file(path).await {
                Ok(()) => debug!("Removed stale artifact {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("failed to remove {}", path.display()))
                }
            }
        }
        Ok(())
    }

    /// Write one artifact, replacing any previous content
    pub async fn write(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote {} ({} bytes)", path.display(), content.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths_in(dir: &Path) -> ArtifactPaths {
        ArtifactPaths::from_settings(&OutputSettings {
            directory: dir.to_path_buf(),
            ..OutputSettings::default()
        })
    }

    #[test]
    fn test_default_file_names() {
        let paths = paths_in(Path::new("out"));
        assert_eq!(paths.search_results, Path::new("out/search_results.md"));
        assert_eq!(
            paths.merged_results,
            Path::new("out/search_results_with_global_citations.md")
        );
        assert_eq!(paths.report, Path::new("out/research_report.md"));
    }

    #[tokio::test]
    async fn test_prepare_removes_stale_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        std::fs::write(&paths.report, "old report").unwrap();
        std::fs::write(dir.path().join("notes.md"), "keep me").unwrap();

        paths.prepare().await.unwrap();

        assert!(!paths.report.exists());
        assert!(dir.path().join("notes.md").exists());
    }

    #[tokio::test]
    async fn test_prepare_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(&dir.path().join("nested/run"));

        paths.prepare().await.unwrap();
        paths.write(&paths.search_results, "# q\n").await.unwrap();

        assert_eq!(std::fs::read_to_string(&paths.search_results).unwrap(), "# q\n");
    }
}
