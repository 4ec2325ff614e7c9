//! Persisted section document format
//!
//! The raw document written during scheduling and the merged document written
//! after citation renumbering share one block structure, so this module is the
//! single place that knows how to write and read it.

mod format;
mod parser;

pub use format::*;
pub use parser::{parse_citation_line, parse_document, render_blocks, Block};
