//! Inline citation markers inside section content

use once_cell::sync::Lazy;
use regex::Regex;

/// A maximal run of adjacent bracket groups, e.g. `[1][2]`
static MARKER_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\[\d+\])+").expect("marker run pattern is valid"));

/// A single bracket group inside a run
static MARKER_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d+)\]").expect("marker id pattern is valid"));

/// A run of adjacent citation references found in content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMarker {
    /// Byte offset of the first `[`
    pub start: usize,
    /// Byte offset just past the last `]`
    pub end: usize,
    /// Referenced ids in written order; `None` for numbers too large to parse
    pub ids: Vec<Option<usize>>,
}

/// Find all inline markers in `content`, in order
pub fn find_markers(content: &str) -> Vec<InlineMarker> {
    MARKER_RUN
        .find_iter(content)
        .map(|run| InlineMarker {
            start: run.start(),
            end: run.end(),
            ids: MARKER_ID
                .captures_iter(run.as_str())
                .map(|caps| caps[1].parse().ok())
                .collect(),
        })
        .collect()
}

/// Consecutive local to global id mapping for one section.
///
/// Local ids `1..=len` map to `first..first + len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitationMap {
    first: usize,
    len: usize,
}

impl CitationMap {
    pub fn new(first: usize, len: usize) -> Self {
        Self { first, len }
    }

    /// Global id for a local id, if the section lists that many citations
    pub fn global(&self, local: usize) -> Option<usize> {
        if local >= 1 && local <= self.len {
            Some(self.first + local - 1)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Rewrite every marker run in `content` through `map`.
///
/// Each bracket group is rewritten on its own, so `[1][2]` becomes `[5][6]`
/// and never `[5, 6]`. Groups without a mapping keep their original text.
pub fn rewrite_markers(content: &str, map: &CitationMap) -> String {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;

    for marker in find_markers(content) {
        out.push_str(&content[last..marker.start]);
        let groups = MARKER_ID.find_iter(&content[marker.start..marker.end]);
        for (id, group) in marker.ids.iter().zip(groups) {
            match id.and_then(|local| map.global(local)) {
                Some(global) => {
                    out.push('[');
                    out.push_str(&global.to_string());
                    out.push(']');
                }
                None => out.push_str(group.as_str()),
            }
        }
        last = marker.end;
    }

    out.push_str(&content[last..]);
    out
}

/// Count marker groups in `content` that `map` cannot resolve
pub fn dangling_markers(content: &str, map: &CitationMap) -> usize {
    find_markers(content)
        .iter()
        .flat_map(|marker| marker.ids.iter())
        .filter(|id| id.and_then(|local| map.global(local)).is_none())
        .count()
}
