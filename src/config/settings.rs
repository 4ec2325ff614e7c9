//! Settings structures for Deep-Research-RS configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main settings structure, loaded from `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub research: ResearchSettings,
    pub providers: ProvidersSettings,
    pub output: OutputSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("DEEP_RESEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("DEEP_RESEARCH_MAX_DEPTH") {
            if let Ok(depth) = val.parse() {
                self.research.max_depth = depth;
            }
        }
        if let Ok(val) = std::env::var("DEEP_RESEARCH_OUTPUT_DIR") {
            self.output.directory = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("PERPLEXITY_API_KEY") {
            if !val.is_empty() {
                self.providers.search.api_key = Some(val);
            }
        }
        if let Ok(val) = std::env::var("OPENROUTER_API_KEY") {
            if !val.is_empty() {
                self.providers.chat.api_key = Some(val);
            }
        }
    }

    /// Check that a research run can be started with these settings
    pub fn validate(&self) -> Result<()> {
        if self.providers.search.api_key.is_none() {
            bail!("No search provider API key configured (set PERPLEXITY_API_KEY)");
        }
        if self.providers.chat.api_key.is_none() {
            bail!("No chat provider API key configured (set OPENROUTER_API_KEY)");
        }
        if self.providers.search.request_timeout <= 0.0 {
            bail!("providers.search.request_timeout must be positive");
        }
        Ok(())
    }
}

/// General settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
}

/// Research behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchSettings {
    /// Expansion rounds per sub-question; a session runs at most this plus one waves
    pub max_depth: usize,
    /// Run all sub-question sessions concurrently instead of one at a time
    pub parallel_sub_questions: bool,
    /// Model used by the search provider
    pub search_model: String,
    /// Model used for decomposition and completeness judgments
    pub analysis_model: String,
    /// Model used to write the final report
    pub writing_model: String,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            max_depth: crate::DEFAULT_MAX_DEPTH,
            parallel_sub_questions: false,
            search_model: "sonar".to_string(),
            analysis_model: "deepseek/deepseek-r1".to_string(),
            writing_model: "google/gemini-2.0-flash-001".to_string(),
        }
    }
}

/// External provider endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersSettings {
    /// Answer-with-citations search provider
    pub search: ProviderSettings,
    /// Chat completion provider
    pub chat: ProviderSettings,
}

impl Default for ProvidersSettings {
    fn default() -> Self {
        Self {
            search: ProviderSettings {
                base_url: "https://api.perplexity.ai".to_string(),
                ..Default::default()
            },
            chat: ProviderSettings {
                base_url: "https://openrouter.ai/api/v1".to_string(),
                request_timeout: 300.0,
                ..Default::default()
            },
        }
    }
}

/// Connection settings for one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Base URL; `/chat/completions` is appended
    pub base_url: String,
    /// Bearer token
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Sampling temperature
    pub temperature: f32,
    /// Idle connections kept per host
    pub pool_maxsize: usize,
    /// Optional proxy for all requests
    pub proxy: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            request_timeout: crate::DEFAULT_SEARCH_TIMEOUT as f64,
            temperature: 1.0,
            pool_maxsize: 20,
            proxy: None,
        }
    }
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.request_timeout.max(0.0))
    }

    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Where run artifacts are written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: PathBuf,
    /// Raw sections in append order
    pub search_results_file: String,
    /// Sections after citation renumbering
    pub merged_results_file: String,
    pub report_file: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            search_results_file: "search_results.md".to_string(),
            merged_results_file: "search_results_with_global_citations.md".to_string(),
            report_file: "research_report.md".to_string(),
        }
    }
}

impl OutputSettings {
    pub fn search_results_path(&self) -> PathBuf {
        self.directory.join(&self.search_results_file)
    }

    pub fn merged_results_path(&self) -> PathBuf {
        self.directory.join(&self.merged_results_file)
    }

    pub fn report_path(&self) -> PathBuf {
        self.directory.join(&self.report_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.research.max_depth, 2);
        assert!(!settings.general.debug);
        assert!(!settings.research.parallel_sub_questions);
        assert_eq!(
            settings.providers.search.completions_url(),
            "https://api.perplexity.ai/chat/completions"
        );
        assert_eq!(
            settings.providers.chat.completions_url(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
research:
  max_depth: 4
  parallel_sub_questions: true
providers:
  search:
    base_url: "http://localhost:9000/"
    api_key: "pplx-test"
output:
  directory: "/tmp/research"
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(settings.research.max_depth, 4);
        assert!(settings.research.parallel_sub_questions);
        assert_eq!(settings.research.search_model, "sonar");
        assert_eq!(
            settings.providers.search.completions_url(),
            "http://localhost:9000/chat/completions"
        );
        assert_eq!(settings.providers.search.request_timeout, 120.0);
        assert_eq!(
            settings.output.report_path(),
            PathBuf::from("/tmp/research/research_report.md")
        );
    }

    #[test]
    fn test_validate_requires_both_keys() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_err());

        settings.providers.search.api_key = Some("pplx".to_string());
        assert!(settings.validate().is_err());

        settings.providers.chat.api_key = Some("or".to_string());
        assert!(settings.validate().is_ok());
    }
}
