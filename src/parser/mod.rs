//! # Request-definition parser
//!
//! Reads the `.http` grammar: `@name = value` variables, `###` section
//! markers that open and name a test, a `METHOD target` request line,
//! `key: value` headers and a JSON body running to the end of the block.
//!
//! Parsing is permissive. Malformed variable lines and blocks without a
//! request line never fail the file; they come back as [`ParseWarning`]s.

pub mod request;
pub mod segment;

use std::fmt::{self, Display};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};

use crate::environment::{VariableTable, extract_variables};
use crate::error::RunError;
use crate::testing::TestCase;

pub use request::parse_block;
pub use segment::{Block, Segmenter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    MalformedVariable { line: usize },
    UnusableBlock { line: usize, reason: String },
    ExtraRequestLine { line: usize },
    UnresolvedVariable { name: String, case: String },
}

impl Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::MalformedVariable { line } => {
                write!(f, "line {line}: malformed variable declaration ignored")
            }
            ParseWarning::UnusableBlock { line, reason } => {
                write!(f, "line {line}: block skipped ({reason})")
            }
            ParseWarning::ExtraRequestLine { line } => {
                write!(f, "line {line}: additional request line ignored")
            }
            ParseWarning::UnresolvedVariable { name, case } => {
                write!(f, "{case}: variable `{{{{{name}}}}}` is not declared")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// `###` headings starting with one of these are file headers, not tests.
    pub section_headers: Vec<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            section_headers: vec!["SEGAPI".to_string(), "Use REST".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub variables: VariableTable,
    pub cases: Vec<TestCase>,
    pub warnings: Vec<ParseWarning>,
}

/// Parse a whole request-definition file. Never fails.
pub fn parse_document(text: &str, options: &ParserOptions) -> ParsedDocument {
    let scan = extract_variables(text);
    let mut warnings: Vec<ParseWarning> = scan
        .malformed
        .iter()
        .map(|&line| ParseWarning::MalformedVariable { line })
        .collect();

    let segmenter = Segmenter::new(options.section_headers.clone());
    let cases = segmenter
        .split(text)
        .iter()
        .filter_map(|block| parse_block(block, &scan.table, &mut warnings))
        .collect();

    ParsedDocument {
        variables: scan.table,
        cases,
        warnings,
    }
}

/// Read and parse a request-definition file, logging every warning.
pub fn load_file(path: &Path, options: &ParserOptions) -> Result<ParsedDocument, RunError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => RunError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => RunError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let document = parse_document(&content, options);
    for warning in &document.warnings {
        warn!(file = %path.display(), "{warning}");
    }
    info!(
        file = %path.display(),
        variables = document.variables.len(),
        cases = document.cases.len(),
        "request definitions loaded"
    );

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::method::HttpMethod;

    const WIDGETS: &str = "\
@baseId = 42
### Get widget - should succeed
GET /widgets/{{baseId}}
### Get widget - Invalid (should return 400)
GET /widgets/0
";

    #[test]
    fn parses_widget_example() {
        let document = parse_document(WIDGETS, &ParserOptions::default());

        assert!(document.warnings.is_empty());
        assert_eq!(document.cases.len(), 2);
        assert_eq!(document.cases[0].method, HttpMethod::Get);
        assert_eq!(document.cases[0].path, "/widgets/42");
        assert_eq!(document.cases[0].expected_status_codes, vec![200]);
        assert_eq!(document.cases[1].path, "/widgets/0");
        assert_eq!(document.cases[1].expected_status_codes, vec![400]);
    }

    #[test]
    fn case_count_matches_usable_blocks() {
        let text = "\
### One
GET /one
### Notes only
see the wiki
### Two
POST /two
{\"a\": 1}
@broken
### Three
DELETE /three
";
        let options = ParserOptions::default();
        let blocks = Segmenter::new(options.section_headers.clone()).split(text);
        let document = parse_document(text, &options);

        let unusable = document
            .warnings
            .iter()
            .filter(|warning| matches!(warning, ParseWarning::UnusableBlock { .. }))
            .count();
        assert_eq!(blocks.len(), 4);
        assert_eq!(unusable, 1);
        assert_eq!(document.cases.len(), blocks.len() - unusable);
        assert!(document.warnings.contains(&ParseWarning::MalformedVariable { line: 8 }));
        assert!(
            document
                .warnings
                .contains(&ParseWarning::UnusableBlock { line: 3, reason: "no request line".to_string() })
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        let document = parse_document("", &ParserOptions::default());
        assert!(document.cases.is_empty());
        assert!(document.warnings.is_empty());
    }

    #[test]
    fn warning_messages_name_the_problem() {
        let warning = ParseWarning::UnresolvedVariable {
            name: "token".to_string(),
            case: "Login".to_string(),
        };
        assert_eq!(warning.to_string(), "Login: variable `{{token}}` is not declared");
    }

    #[test]
    fn missing_file_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("missing.http"), &ParserOptions::default()).unwrap_err();
        assert!(matches!(err, RunError::InputNotFound { .. }));
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("endpoints.http");
        fs::write(&path, WIDGETS).unwrap();

        let document = load_file(&path, &ParserOptions::default()).unwrap();
        assert_eq!(document.cases.len(), 2);
        assert_eq!(document.variables.get("baseId"), Some("42"));
    }
}
