//! Turns one block into a [`TestCase`].

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::environment::VariableTable;
use crate::http::headers::HeaderList;
use crate::http::method::HttpMethod;
use crate::testing::{DEFAULT_STATUS_CODE, TestCase};

use super::ParseWarning;
use super::segment::{Block, SECTION_MARKER};

static REQUEST_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(GET|POST|PUT|DELETE|PATCH)\s+(.+)$").expect("valid request line pattern")
});

static HTTP_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+HTTP/\d+(?:\.\d+)?$").expect("valid version pattern"));

/// Maps name fragments to the status a test is expected to return.
#[derive(Debug, Clone, Copy)]
pub struct StatusRule {
    pub needles: &'static [&'static str],
    pub status: u16,
}

/// Checked in order; the first rule with a matching needle wins.
pub const STATUS_RULES: &[StatusRule] = &[
    StatusRule {
        needles: &["invalid", "400"],
        status: 400,
    },
    StatusRule {
        needles: &["not found", "404"],
        status: 404,
    },
    StatusRule {
        needles: &["unauthorized", "401"],
        status: 401,
    },
];

pub fn infer_status_codes(name: &str) -> Vec<u16> {
    let lowered = name.to_lowercase();
    let status = STATUS_RULES
        .iter()
        .find(|rule| rule.needles.iter().any(|needle| lowered.contains(needle)))
        .map_or(DEFAULT_STATUS_CODE, |rule| rule.status);
    vec![status]
}

/// Keep word characters, whitespace and hyphens; then turn whitespace and
/// hyphens into underscores.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
        .collect()
}

pub fn synthesize_name(method: HttpMethod, path: &str) -> String {
    let without_query = path.split('?').next().unwrap_or_default();
    format!(
        "{method}_{}_Should_Return_SuccessStatusCode",
        without_query.replace('/', "_")
    )
}

/// Extract the test name from a `###` heading; an empty remainder is no name.
fn heading_name(heading: &str) -> Option<&str> {
    heading
        .trim()
        .strip_prefix(SECTION_MARKER)
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

fn parse_request_line(trimmed: &str) -> Option<(HttpMethod, String)> {
    let caps = REQUEST_LINE.captures(trimmed)?;
    let method = caps[1].parse().ok()?;
    let target = HTTP_VERSION.replace(caps[2].trim(), "").into_owned();
    Some((method, target))
}

/// Parse one block. Returns `None` for blocks with no usable request line;
/// anything noteworthy along the way is pushed to `warnings`.
pub fn parse_block(
    block: &Block,
    variables: &VariableTable,
    warnings: &mut Vec<ParseWarning>,
) -> Option<TestCase> {
    let name = block.heading.as_deref().and_then(heading_name);
    let expected = name.map_or_else(|| vec![DEFAULT_STATUS_CODE], infer_status_codes);

    let mut request: Option<(HttpMethod, String)> = None;
    let mut headers = HeaderList::new();
    let mut body_lines: Vec<&str> = Vec::new();
    let mut in_body = false;

    let first_content_line = block.line + usize::from(block.heading.is_some());
    for (offset, line) in block.lines.iter().enumerate() {
        let trimmed = line.trim();

        if in_body {
            body_lines.push(line.as_str());
            continue;
        }

        if let Some(parsed) = parse_request_line(trimmed) {
            if request.is_some() {
                warnings.push(ParseWarning::ExtraRequestLine {
                    line: first_content_line + offset,
                });
            } else {
                request = Some(parsed);
            }
            continue;
        }

        if trimmed.starts_with('{') {
            in_body = true;
            body_lines.push(line.as_str());
            continue;
        }

        if request.is_some() {
            if let Some((key, value)) = trimmed.split_once(':') {
                let key = key.trim();
                if !key.is_empty() {
                    headers.insert(key, value.trim());
                }
                continue;
            }
        }

        debug!(line = first_content_line + offset, text = trimmed, "line ignored");
    }

    let Some((method, raw_target)) = request.filter(|(_, target)| !target.is_empty()) else {
        warnings.push(ParseWarning::UnusableBlock {
            line: block.line,
            reason: "no request line".to_string(),
        });
        return None;
    };

    let interpolated = variables.interpolate(&raw_target);
    let name = match name {
        Some(name) => name.to_string(),
        None => synthesize_name(method, &interpolated.text),
    };
    let name = sanitize_name(&name);

    for variable in interpolated.unresolved {
        warnings.push(ParseWarning::UnresolvedVariable {
            name: variable,
            case: name.clone(),
        });
    }

    let mut case = TestCase::new(name, method, interpolated.text).with_expected_status_codes(expected);
    case.headers = headers;
    if !body_lines.is_empty() {
        case.request_body = Some(body_lines.join("\n"));
    }

    Some(case)
}
