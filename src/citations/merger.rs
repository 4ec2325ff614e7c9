//! Document-wide citation renumbering

use super::markers::{dangling_markers, rewrite_markers, CitationMap};
use crate::document::{parse_document, write_block, Block};
use crate::results::Section;
use serde::Serialize;
use tracing::debug;

/// A citation with its document-wide id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub id: usize,
    pub url: String,
}

/// A section rewritten to document-wide numbering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedSection {
    pub query: String,
    pub content: String,
    pub citations: Vec<Citation>,
}

impl MergedSection {
    /// Global ids of this section's citations, in listed order
    pub fn citation_ids(&self) -> Vec<usize> {
        self.citations.iter().map(|c| c.id).collect()
    }

    fn write_to(&self, out: &mut String) {
        write_block(
            out,
            &self.query,
            &self.content,
            self.citations.iter().map(|c| (c.id, c.url.as_str())),
        );
    }
}

/// One block of a merged document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergedBlock {
    Section(MergedSection),
    /// Text without a recognizable citations block, passed through as read
    Verbatim(String),
}

/// Sections in original order, each keeping its own renumbered citation list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedDocument {
    blocks: Vec<MergedBlock>,
}

impl MergedDocument {
    pub fn blocks(&self) -> &[MergedBlock] {
        &self.blocks
    }

    /// Iterate over the renumbered sections, skipping verbatim blocks
    pub fn sections(&self) -> impl Iterator<Item = &MergedSection> {
        self.blocks.iter().filter_map(|block| match block {
            MergedBlock::Section(section) => Some(section),
            MergedBlock::Verbatim(_) => None,
        })
    }

    /// Total number of global ids assigned
    pub fn citation_count(&self) -> usize {
        self.sections().map(|s| s.citations.len()).sum()
    }

    /// Render in the persisted block format
    pub fn render(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                MergedBlock::Section(section) => section.write_to(&mut out),
                MergedBlock::Verbatim(text) => out.push_str(text),
            }
        }
        out
    }
}

/// Running global counter for one merge.
///
/// Ids are handed out in call order, so sections must be fed in document
/// order. Identical URLs in different sections get distinct ids.
#[derive(Debug, Default)]
pub struct CitationMerger {
    assigned: usize,
}

impl CitationMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of global ids handed out so far
    pub fn assigned(&self) -> usize {
        self.assigned
    }

    /// Reserve the next `count` global ids
    pub fn assign(&mut self, count: usize) -> CitationMap {
        let map = CitationMap::new(self.assigned + 1, count);
        self.assigned += count;
        map
    }

    /// Renumber one section's citation list and inline markers
    pub fn merge_section(&mut self, section: &Section) -> MergedSection {
        let map = self.assign(section.citations.len());

        let dangling = dangling_markers(&section.content, &map);
        if dangling > 0 {
            debug!(
                "Section '{}' has {} marker(s) without a matching citation",
                section.query, dangling
            );
        }

        let citations = section
            .citations
            .iter()
            .enumerate()
            .filter_map(|(i, url)| {
                map.global(i + 1).map(|id| Citation {
                    id,
                    url: url.clone(),
                })
            })
            .collect();

        MergedSection {
            query: section.query.clone(),
            content: rewrite_markers(&section.content, &map),
            citations,
        }
    }

    /// Renumber a parsed block; verbatim blocks pass through
    pub fn merge_block(&mut self, block: Block) -> MergedBlock {
        match block {
            Block::Section(section) => MergedBlock::Section(self.merge_section(&section)),
            Block::Verbatim(text) => MergedBlock::Verbatim(text),
        }
    }
}

/// Merge typed sections, e.g. straight from a [`crate::ResultStore`]
pub fn merge_sections<'a, I>(sections: I) -> MergedDocument
where
    I: IntoIterator<Item = &'a Section>,
{
    let mut merger = CitationMerger::new();
    let blocks = sections
        .into_iter()
        .filter(|section| !is_blank(section))
        .map(|section| MergedBlock::Section(merger.merge_section(section)))
        .collect();
    debug!("Assigned {} global citation ids", merger.assigned());
    MergedDocument { blocks }
}

/// Merge a serialized section document
pub fn merge_document(text: &str) -> MergedDocument {
    let mut merger = CitationMerger::new();
    let blocks = parse_document(text)
        .into_iter()
        .map(|block| merger.merge_block(block))
        .collect();
    debug!("Assigned {} global citation ids", merger.assigned());
    MergedDocument { blocks }
}

fn is_blank(section: &Section) -> bool {
    section.query.trim().is_empty()
        && section.content.trim().is_empty()
        && section.citations.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::render_sections;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_ids_follow_document_order() {
        let sections = vec![
            Section::new("a", "A[1][2]", urls(&["http://a1", "http://a2"])),
            Section::new("b", "B has none", vec![]),
            Section::new("c", "C[3][1]", urls(&["http://c1", "http://c2", "http://c3"])),
        ];

        let merged = merge_sections(&sections);
        let ids: Vec<Vec<usize>> = merged.sections().map(|s| s.citation_ids()).collect();

        assert_eq!(ids, vec![vec![1, 2], vec![], vec![3, 4, 5]]);
        assert_eq!(merged.citation_count(), 5);
        assert_eq!(merged.sections().nth(2).unwrap().content, "C[5][3]");
    }

    #[test]
    fn test_two_section_document() {
        let document = "# A\n## content\nX is true[1][2].\n\
                        ## citations\n1. http://a\n2. http://b\n***\n\n\
                        # B\n## content\nY is false[1].\n## citations\n1. http://c\n***\n\n";

        let merged = merge_document(document);

        assert_eq!(
            merged.render(),
            "# A\n## content\nX is true[1][2].\n## citations\n1. http://a\n2. http://b\n***\n\n\
             # B\n## content\nY is false[3].\n## citations\n3. http://c\n***\n\n"
        );
    }

    #[test]
    fn test_printed_labels_are_ignored() {
        let document = "# A\n## content\nfirst[1]\n## citations\n1. http://a\n***\n\n\
                        # B\n## content\nsecond[1][2]\n\
                        ## citations\n7. http://b\n7. http://c\n***\n\n";

        let merged = merge_document(document);
        let b = merged.sections().nth(1).unwrap();

        assert_eq!(b.citation_ids(), vec![2, 3]);
        assert_eq!(b.content, "second[2][3]");
    }

    #[test]
    fn test_same_url_gets_distinct_ids() {
        let sections = vec![
            Section::new("a", "a[1]", urls(&["http://same"])),
            Section::new("b", "b[1]", urls(&["http://same"])),
        ];

        let merged = merge_sections(&sections);
        let ids: Vec<usize> = merged.sections().flat_map(|s| s.citation_ids()).collect();

        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_document_without_citations_unchanged() {
        let sections = vec![
            Section::new("a", "plain [1] text", vec![]),
            Section::failed("b", "HTTP 502: bad gateway"),
        ];
        let document = render_sections(&sections);

        assert_eq!(merge_document(&document).render(), document);
    }

    #[test]
    fn test_unrecognized_block_passes_through() {
        let broken = "# broken\n## content\nno list[1]\n";
        let document = format!(
            "{}{}",
            broken,
            render_sections(&[Section::new("ok", "ok[1]", urls(&["http://ok"]))])
        );

        let merged = merge_document(&document);

        assert_eq!(merged.blocks()[0], MergedBlock::Verbatim(broken.to_string()));
        assert_eq!(merged.sections().next().unwrap().citation_ids(), vec![1]);
    }

    #[test]
    fn test_whitespace_blocks_omitted() {
        let document = format!(
            "   \n\n{}",
            render_sections(&[Section::new("q", "c[1]", urls(&["http://x"]))])
        );
        assert_eq!(merge_document(&document).blocks().len(), 1);

        let sections = vec![Section::new(" ", "  \n", vec![]), Section::new("q", "c", vec![])];
        assert_eq!(merge_sections(&sections).blocks().len(), 1);
    }

    #[test]
    fn test_typed_and_serialized_paths_agree() {
        let sections = vec![
            Section::new("a", "A[2][1]", urls(&["http://a1", "http://a2"])),
            Section::failed("b", "timeout"),
            Section::new("c", "C[1]", urls(&["http://c1"])),
        ];

        let typed = merge_sections(&sections).render();
        let serialized = merge_document(&render_sections(&sections)).render();

        assert_eq!(typed, serialized);
    }

    #[test]
    fn test_multiline_query_keeps_later_ids() {
        let sections = vec![
            Section::new("line one\nline two", "A[1]", urls(&["http://a"])),
            Section::new("b", "B[1]", urls(&["http://c"])),
        ];

        let typed = merge_sections(&sections).render();
        let serialized = merge_document(&render_sections(&sections)).render();

        assert_eq!(typed, serialized);
        assert!(serialized.contains("B[2]\n## citations\n2. http://c\n"));
    }

    #[test]
    fn test_citations_heading_in_content_keeps_later_ids() {
        let sections = vec![
            Section::new(
                "a",
                "A[1][2]\n## citations\nquoted heading",
                urls(&["http://a1", "http://a2"]),
            ),
            Section::new("b", "B[1]", urls(&["http://c"])),
        ];

        let typed = merge_sections(&sections).render();
        let serialized = merge_document(&render_sections(&sections)).render();

        assert_eq!(typed, serialized);
        assert!(serialized.contains("B[3]\n## citations\n3. http://c\n"));
    }

    #[test]
    fn test_counter_never_resets() {
        let mut merger = CitationMerger::new();
        assert_eq!(merger.assign(2).global(1), Some(1));
        assert_eq!(merger.assign(0).global(1), None);
        assert_eq!(merger.assign(3).global(1), Some(3));
        assert_eq!(merger.assigned(), 5);
    }
}
