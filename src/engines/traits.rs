//! Search engine trait and types

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Answer returned by an answer-with-citations search provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchAnswer {
    /// Markdown answer, possibly with inline markers like `[1][2]`
    pub content: String,
    /// Cited URLs; marker `[n]` refers to the n-th entry
    #[serde(default)]
    pub citations: Vec<String>,
}

impl SearchAnswer {
    pub fn new(content: impl Into<String>, citations: Vec<String>) -> Self {
        Self {
            content: content.into(),
            citations,
        }
    }
}

/// A provider that answers a single query with text and citations
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Engine name, used in logs and metrics
    fn name(&self) -> &str;

    /// Model identifier sent with each request
    fn model(&self) -> &str;

    /// Answer one query
    async fn search(&self, query: &str) -> Result<SearchAnswer, ProviderError>;
}
