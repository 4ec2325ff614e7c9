//! Writer for the persisted section block format
//!
//! ```text
//! # <query>
//! ## content
//! <content>
//! ## citations
//! 1. <url>
//! ***
//!
//! ```

use crate::results::{normalize_query, Section};

/// Prefix of the line opening a block; the rest of the line is the query
pub const HEADER_PREFIX: &str = "# ";
/// Line opening the content
pub const CONTENT_MARKER: &str = "## content";
/// Line opening the citations list
pub const CITATIONS_MARKER: &str = "## citations";
/// Sole citation line of a section without citations
pub const NO_CITATIONS: &str = "No citations available";
/// Line closing a block
pub const BLOCK_TERMINATOR: &str = "***";

/// Append one block to `out`, labelling each citation with the given id.
///
/// The query is normalized onto one line so the header stays parseable.
pub fn write_block<'a, I>(out: &mut String, query: &str, content: &str, citations: I)
where
    I: IntoIterator<Item = (usize, &'a str)>,
{
    out.push_str(HEADER_PREFIX);
    out.push_str(&normalize_query(query));
    out.push('\n');
    out.push_str(CONTENT_MARKER);
    out.push('\n');
    out.push_str(content);
    out.push('\n');
    out.push_str(CITATIONS_MARKER);
    out.push('\n');

    let mut wrote_citation = false;
    for (id, url) in citations {
        out.push_str(&format!("{}. {}\n", id, url));
        wrote_citation = true;
    }
    if !wrote_citation {
        out.push_str(NO_CITATIONS);
        out.push('\n');
    }

    out.push_str(BLOCK_TERMINATOR);
    out.push_str("\n\n");
}

/// Render a section with its local (1-based) citation numbering
pub fn render_section(section: &Section) -> String {
    let mut out = String::new();
    write_section(&mut out, section);
    out
}

/// Render a sequence of sections as a raw document
pub fn render_sections<'a, I>(sections: I) -> String
where
    I: IntoIterator<Item = &'a Section>,
{
    let mut out = String::new();
    for section in sections {
        write_section(&mut out, section);
    }
    out
}

fn write_section(out: &mut String, section: &Section) {
    write_block(
        out,
        &section.query,
        &section.content,
        section
            .citations
            .iter()
            .enumerate()
            .map(|(i, url)| (i + 1, url.as_str())),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_citations() {
        let section = Section::new(
            "what is x",
            "X is true[1][2].",
            vec!["http://a".to_string(), "http://b".to_string()],
        );
        assert_eq!(
            render_section(&section),
            "# what is x\n## content\nX is true[1][2].\n\
             ## citations\n1. http://a\n2. http://b\n***\n\n"
        );
    }

    #[test]
    fn test_render_without_citations() {
        let section = Section::failed("q", "HTTP 500: oops");
        assert_eq!(
            render_section(&section),
            "# q\n## content\nSearch Error: HTTP 500: oops\n\
             ## citations\nNo citations available\n***\n\n"
        );
    }

    #[test]
    fn test_multiline_query_stays_on_header_line() {
        let section = Section::new("line one\nline two", "A[1]", vec!["http://a".to_string()]);
        assert!(render_section(&section).starts_with("# line one line two\n## content\n"));
    }

    #[test]
    fn test_custom_labels() {
        let mut out = String::new();
        write_block(&mut out, "q", "c", vec![(7, "http://z")]);
        assert!(out.contains("\n7. http://z\n"));
    }
}
