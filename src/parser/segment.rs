//! Splits a request-definition file into candidate test blocks.

use tracing::debug;

/// Marker that opens a block and optionally names it.
pub const SECTION_MARKER: &str = "###";

/// One candidate test: an optional `###` heading plus its content lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The raw boundary line, if the block was opened by one.
    pub heading: Option<String>,
    /// Content lines, verbatim apart from a trailing `\r`.
    pub lines: Vec<String>,
    /// 1-based line number of the first line belonging to the block.
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Skip,
    Boundary,
    Content,
}

/// Line classifier configured with the protected section headers.
#[derive(Debug, Clone)]
pub struct Segmenter {
    section_headers: Vec<String>,
}

impl Segmenter {
    pub fn new(section_headers: Vec<String>) -> Self {
        Self { section_headers }
    }

    /// Whether a `###` line is a file-level section header rather than a test.
    pub fn is_section_header(&self, trimmed: &str) -> bool {
        trimmed
            .strip_prefix(SECTION_MARKER)
            .map(str::trim_start)
            .is_some_and(|rest| {
                self.section_headers
                    .iter()
                    .any(|header| !header.is_empty() && rest.starts_with(header.as_str()))
            })
    }

    fn classify(&self, line: &str) -> LineKind {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('@') || self.is_section_header(trimmed) {
            LineKind::Skip
        } else if trimmed.starts_with(SECTION_MARKER) {
            LineKind::Boundary
        } else {
            LineKind::Content
        }
    }

    pub fn split(&self, text: &str) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut current: Option<Block> = None;

        for (index, raw) in text.split('\n').enumerate() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            let number = index + 1;

            match self.classify(line) {
                LineKind::Skip => {}
                LineKind::Boundary => {
                    flush(&mut blocks, current.take());
                    current = Some(Block {
                        heading: Some(line.to_string()),
                        lines: Vec::new(),
                        line: number,
                    });
                }
                LineKind::Content => current
                    .get_or_insert_with(|| Block {
                        heading: None,
                        lines: Vec::new(),
                        line: number,
                    })
                    .lines
                    .push(line.to_string()),
            }
        }

        flush(&mut blocks, current);
        blocks
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(vec!["SEGAPI".to_string(), "Use REST".to_string()])
    }
}

fn flush(blocks: &mut Vec<Block>, block: Option<Block>) {
    let Some(block) = block else {
        return;
    };

    if block.lines.is_empty() {
        debug!(line = block.line, "empty block discarded");
        return;
    }
    blocks.push(block);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
### SEGAPI Contract Tests - Manual HTTP Tests
### Use REST Client extension in VS Code to execute these requests

@baseUrl = http://localhost:5225

### === USERS ENDPOINTS ===

### List users
GET {{baseUrl}}/users

### Create user
POST {{baseUrl}}/users
Content-Type: application/json

{
  \"name\": \"Ana\"
}
";

    #[test]
    fn splits_on_markers_and_drops_structural_lines() {
        let blocks = Segmenter::default().split(SAMPLE);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].heading.as_deref(), Some("### List users"));
        assert_eq!(blocks[0].lines, vec!["GET {{baseUrl}}/users"]);
        assert_eq!(blocks[0].line, 8);
        assert_eq!(blocks[1].heading.as_deref(), Some("### Create user"));
        assert_eq!(
            blocks[1].lines,
            vec![
                "POST {{baseUrl}}/users",
                "Content-Type: application/json",
                "{",
                "  \"name\": \"Ana\"",
                "}",
            ]
        );
    }

    #[test]
    fn heading_without_content_yields_nothing() {
        let blocks = Segmenter::default().split("### only a title\n\n### another\n");
        assert!(blocks.is_empty());
    }

    #[test]
    fn content_before_first_marker_forms_unnamed_block() {
        let blocks = Segmenter::default().split("GET /health\n### Next\nGET /next\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].heading, None);
        assert_eq!(blocks[0].lines, vec!["GET /health"]);
        assert_eq!(blocks[1].line, 2);
    }

    #[test]
    fn strips_carriage_returns_but_keeps_indentation() {
        let blocks = Segmenter::default().split("### A\r\nPOST /a\r\n  {\"k\": 1}\r\n");
        assert_eq!(blocks[0].heading.as_deref(), Some("### A"));
        assert_eq!(blocks[0].lines, vec!["POST /a", "  {\"k\": 1}"]);
    }

    #[test]
    fn custom_section_headers_are_respected() {
        let segmenter = Segmenter::new(vec!["Billing API".to_string()]);
        let blocks = segmenter.split("### Billing API notes\nGET /x\n### SEGAPI test\nGET /y\n");

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].heading, None);
        assert_eq!(blocks[0].lines, vec!["GET /x"]);
        assert_eq!(blocks[1].heading.as_deref(), Some("### SEGAPI test"));
        assert_eq!(blocks[1].lines, vec!["GET /y"]);
    }
}
