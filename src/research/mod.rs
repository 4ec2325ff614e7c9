//! Research run orchestration
//!
//! Ties planning, per-sub-question search, citation merging and report
//! writing together and persists the artifacts of each stage.

mod artifacts;
mod pipeline;

pub use artifacts::ArtifactPaths;
pub use pipeline::{PipelineOptions, ResearchOutcome, ResearchPipeline};
