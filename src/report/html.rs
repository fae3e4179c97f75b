use std::fmt::Write as _;

use time::OffsetDateTime;

use crate::testing::{RunSummary, TestResult};

use super::{millis, timestamp};

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2rem; color: #222; }
.summary { display: flex; gap: 2rem; margin-bottom: 1.5rem; }
.test { border-left: 4px solid; padding: 0.5rem 1rem; margin-bottom: 0.5rem; }
.passed { border-color: #2e7d32; background: #f1f8e9; }
.failed { border-color: #c62828; background: #ffebee; }
.error { font-family: monospace; white-space: pre-wrap; }";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `contract-test-report.html`, results sorted by test name.
pub fn render_html(results: &[TestResult], generated_at: OffsetDateTime) -> String {
    let summary = RunSummary::from_results(results);
    let mut sorted: Vec<&TestResult> = results.iter().collect();
    sorted.sort_by(|a, b| a.test_name.cmp(&b.test_name));

    let mut out = String::new();
    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>Contract Test Report</title>");
    let _ = writeln!(out, "<style>\n{STYLE}\n</style>\n</head>\n<body>");
    let _ = writeln!(out, "<h1>Contract Test Report</h1>");
    let _ = writeln!(out, "<p>Generated: {}</p>", escape_html(&timestamp(generated_at)));

    let _ = writeln!(out, "<div class=\"summary\">");
    let _ = writeln!(out, "<div>Passed: <strong>{}</strong></div>", summary.passed);
    let _ = writeln!(out, "<div>Failed: <strong>{}</strong></div>", summary.failed);
    let _ = writeln!(out, "<div>Total: <strong>{}</strong></div>", summary.total);
    let _ = writeln!(
        out,
        "<div>Total Time: <strong>{:.0}ms</strong></div>",
        millis(summary.total_time)
    );
    let _ = writeln!(out, "</div>");

    for result in sorted {
        let (class, label) = if result.passed {
            ("passed", "PASSED")
        } else {
            ("failed", "FAILED")
        };
        let _ = writeln!(out, "<div class=\"test {class}\">");
        let _ = writeln!(out, "<h3>{}</h3>", escape_html(&result.test_name));
        let _ = writeln!(
            out,
            "<p>Status: {label} | Time: {:.0}ms</p>",
            millis(result.execution_time)
        );
        if let (false, Some(err)) = (result.passed, &result.error_message) {
            let _ = writeln!(out, "<p class=\"error\">Error: {}</p>", escape_html(err));
        }
        let _ = writeln!(out, "</div>");
    }

    let _ = writeln!(out, "</body>\n</html>");
    out
}
