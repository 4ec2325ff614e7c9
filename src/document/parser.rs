//! Line-oriented parser for section documents
//!
//! A document is split into blocks at header lines. Each block is either a
//! well-formed [`Section`] or kept as verbatim text when its structure is not
//! recognized, so that rendering never loses input.

use super::format::{
    write_block, BLOCK_TERMINATOR, CITATIONS_MARKER, CONTENT_MARKER, HEADER_PREFIX, NO_CITATIONS,
};
use crate::results::Section;

/// One block of a section document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A block with a header, content and a recognizable citations list
    Section(Section),
    /// Text whose structure was not recognized, kept exactly as read
    Verbatim(String),
}

impl Block {
    /// Append this block to `out` in the persisted format
    pub fn write_to(&self, out: &mut String) {
        match self {
            Block::Section(section) => write_block(
                out,
                &section.query,
                &section.content,
                section
                    .citations
                    .iter()
                    .enumerate()
                    .map(|(i, url)| (i + 1, url.as_str())),
            ),
            Block::Verbatim(text) => out.push_str(text),
        }
    }
}

/// Parse a section document into blocks.
///
/// Whitespace-only stretches (including a blank preamble) are dropped.
pub fn parse_document(text: &str) -> Vec<Block> {
    split_blocks(text)
        .into_iter()
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| match parse_section(chunk) {
            Some(section) => Block::Section(section),
            None => Block::Verbatim(chunk.to_string()),
        })
        .collect()
}

/// Render blocks back into a document
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        block.write_to(&mut out);
    }
    out
}

/// Parse a single citation line of the form `<label>. <url>`.
///
/// The label only has to be numeric; its value is ignored by callers.
pub fn parse_citation_line(line: &str) -> Option<&str> {
    let (label, rest) = line.trim().split_once('.')?;
    if label.is_empty() || !label.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let url = rest.trim();
    if url.is_empty() || url.contains(char::is_whitespace) {
        return None;
    }
    Some(url)
}

fn is_header(line: &str) -> bool {
    line.strip_prefix(HEADER_PREFIX)
        .map(|query| !query.trim().is_empty())
        .unwrap_or(false)
}

fn bare(line: &str) -> &str {
    line.trim_end_matches(|c| c == '\n' || c == '\r')
}

/// Split at header lines.
///
/// Inside a block body a level-1 heading only opens a new block when it is
/// directly followed by the content marker. The body ends at a terminator
/// line that completes a well-formed section.
fn split_blocks(text: &str) -> Vec<&str> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut blocks = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    let mut line_in_block = 0;
    let mut opened_by_header = false;
    let mut in_body = false;

    for (index, line) in lines.iter().enumerate() {
        let current = bare(line);
        let followed_by_content = lines.get(index + 1).copied().map(bare) == Some(CONTENT_MARKER);

        if is_header(current) && (!in_body || followed_by_content) {
            in_body = false;
            if offset > start {
                blocks.push(&text[start..offset]);
            }
            start = offset;
            line_in_block = 0;
            opened_by_header = true;
        } else if line_in_block == 1 && opened_by_header && current == CONTENT_MARKER {
            in_body = true;
        } else if in_body
            && current == BLOCK_TERMINATOR
            && parse_section(&text[start..offset + line.len()]).is_some()
        {
            in_body = false;
        }

        line_in_block += 1;
        offset += line.len();
    }

    if start < text.len() {
        blocks.push(&text[start..]);
    }
    blocks
}

/// Parse one block. The last citations marker of the block opens the
/// citations list; earlier ones belong to the content.
fn parse_section(chunk: &str) -> Option<Section> {
    let lines: Vec<&str> = chunk.lines().collect();

    let header = lines.first()?;
    if !is_header(header) {
        return None;
    }
    let query = header[HEADER_PREFIX.len()..].to_string();

    if *lines.get(1)? != CONTENT_MARKER {
        return None;
    }

    let marker = lines.iter().rposition(|line| *line == CITATIONS_MARKER)?;
    let content = lines[2..marker].join("\n");

    let mut rest = lines[marker + 1..].iter();
    let mut citations = Vec::new();
    let mut declared_empty = false;
    for line in rest.by_ref() {
        if *line == BLOCK_TERMINATOR {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == NO_CITATIONS {
            declared_empty = true;
            continue;
        }
        citations.push(parse_citation_line(line)?.to_string());
    }

    if declared_empty && !citations.is_empty() {
        return None;
    }
    // Only blank lines may follow the terminator
    if rest.any(|line| !line.trim().is_empty()) {
        return None;
    }

    Some(Section {
        query,
        content,
        citations,
    })
}
