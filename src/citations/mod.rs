//! Citation merging
//!
//! Every search section numbers its citations locally from 1. Before the
//! sections are handed to the report writer they are renumbered into one
//! document-wide sequence, and every inline marker is rewritten to match.

mod markers;
mod merger;

pub use markers::{dangling_markers, find_markers, rewrite_markers, CitationMap, InlineMarker};
pub use merger::{
    merge_document, merge_sections, Citation, CitationMerger, MergedBlock, MergedDocument,
    MergedSection,
};
