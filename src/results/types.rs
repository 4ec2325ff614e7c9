//! Result type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of the content recorded for a search call that failed
pub const SEARCH_ERROR_PREFIX: &str = "Search Error: ";

/// Collapse every whitespace run of a query to a single space.
///
/// A query is written on a single header line, so it must not contain line
/// breaks.
pub fn normalize_query(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One decomposed research task with its own query set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubQuestion {
    /// What the sub-question is trying to find out
    #[serde(rename = "question")]
    pub description: String,
    /// Seed queries, in the order they were proposed
    #[serde(rename = "query", default)]
    pub queries: Vec<String>,
}

impl SubQuestion {
    /// Create a new sub-question
    pub fn new<I, S>(description: impl Into<String>, queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            description: description.into(),
            queries: queries.into_iter().map(Into::into).collect(),
        }
    }
}

/// The persisted outcome of one search call.
///
/// Sections are created once and never mutated; the citation merger produces
/// new values instead of rewriting these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Query that produced this section
    pub query: String,
    /// Markdown content, possibly containing inline markers like `[1][2]`
    pub content: String,
    /// Citation URLs; a URL's local id is its 1-based position
    #[serde(default)]
    pub citations: Vec<String>,
}

impl Section {
    /// Create a section from a successful search
    pub fn new(
        query: impl Into<String>,
        content: impl Into<String>,
        citations: Vec<String>,
    ) -> Self {
        Self {
            query: query.into(),
            content: content.into(),
            citations,
        }
    }

    /// Create the substitute section recorded for a failed search
    pub fn failed(query: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            query: query.into(),
            content: format!("{}{}", SEARCH_ERROR_PREFIX, error),
            citations: Vec::new(),
        }
    }

    /// Whether this section stands in for a failed search
    pub fn is_error(&self) -> bool {
        self.citations.is_empty() && self.content.starts_with(SEARCH_ERROR_PREFIX)
    }

    /// Number of local citations
    pub fn citation_count(&self) -> usize {
        self.citations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_section() {
        let section = Section::failed("rust async", "request timed out after 2s");
        assert!(section.is_error());
        assert_eq!(section.content, "Search Error: request timed out after 2s");
        assert_eq!(section.citation_count(), 0);
    }

    #[test]
    fn test_sub_question_wire_names() {
        let json = r#"{"question": "What is X?", "query": ["x overview", "x history"]}"#;
        let sub: SubQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(sub, SubQuestion::new("What is X?", ["x overview", "x history"]));
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("line one\nline two"), "line one line two");
        assert_eq!(normalize_query("  a \t b\r\n"), "a b");
        assert_eq!(normalize_query(" \n "), "");
    }

    #[test]
    fn test_sub_question_without_queries() {
        let sub: SubQuestion = serde_json::from_str(r#"{"question": "Why?"}"#).unwrap();
        assert!(sub.queries.is_empty());
    }
}
