//! Deep-Research-RS: iterative, citation-preserving research orchestration
//!
//! A topic is decomposed into sub-questions, each sub-question is searched in
//! depth-bounded waves against an answer-with-citations provider, and all
//! gathered sections are merged into one document with a single consistent
//! citation numbering before the final report is written.

pub mod citations;
pub mod config;
pub mod document;
pub mod engines;
pub mod error;
pub mod judge;
pub mod llm;
pub mod metrics;
pub mod network;
pub mod planner;
pub mod report;
pub mod research;
pub mod results;
pub mod search;

pub use citations::{merge_document, merge_sections, CitationMerger, MergedDocument};
pub use config::Settings;
pub use engines::SearchEngine;
pub use error::{ProviderError, StructuredOutputError};
pub use judge::{CompletenessJudge, Judgment};
pub use results::{ResultStore, Section, SubQuestion};
pub use search::{QueryScheduler, SessionOutcome};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of expansion rounds per sub-question
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Default timeout for a single search call in seconds
pub const DEFAULT_SEARCH_TIMEOUT: u64 = 120;
