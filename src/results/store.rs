//! Append-only store of search sections

use super::types::Section;
use std::sync::{Arc, PoisonError, RwLock};

/// Append-only sequence of sections, in the order they were pushed.
///
/// Cloning is cheap and clones share the same storage, so in-flight search
/// tasks of a wave can append concurrently.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    sections: Arc<RwLock<Vec<Section>>>,
}

impl ResultStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section, returning its position in the store
    pub fn push(&self, section: Section) -> usize {
        let mut sections = self.sections.write().unwrap_or_else(PoisonError::into_inner);
        sections.push(section);
        sections.len() - 1
    }

    /// Snapshot of all sections in append order
    pub fn sections(&self) -> Vec<Section> {
        self.sections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of stored sections
    pub fn len(&self) -> usize {
        self.sections.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been stored yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of sections that stand in for failed searches
    pub fn error_count(&self) -> usize {
        self.sections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.is_error())
            .count()
    }

    /// Render the whole store as a raw section document
    pub fn to_document(&self) -> String {
        let sections = self.sections.read().unwrap_or_else(PoisonError::into_inner);
        crate::document::render_sections(sections.iter())
    }
}
