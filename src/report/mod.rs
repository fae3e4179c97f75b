//! # Reports
//!
//! Renders run results as an HTML page, a JSON document, a plain-text
//! summary and a colored console summary. Writing to disk lives in
//! [`crate::storage`].

pub mod html;
pub mod json;

use std::fmt::Write as _;
use std::time::Duration;

use colored::Colorize;
use serde::Deserialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::testing::{RunSummary, TestResult};

pub use html::render_html;
pub use json::render_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Html,
    Json,
    Text,
}

impl ReportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ReportFormat::Html => "contract-test-report.html",
            ReportFormat::Json => "test-results.json",
            ReportFormat::Text => "summary.txt",
        }
    }
}

pub(crate) fn millis(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

pub(crate) fn timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|_| at.to_string())
}

/// `summary.txt`: totals, success rate and the failures with their errors.
pub fn render_summary_text(results: &[TestResult], generated_at: OffsetDateTime) -> String {
    let summary = RunSummary::from_results(results);
    let mut out = String::new();

    let _ = writeln!(out, "Contract Test Summary");
    let _ = writeln!(out, "=====================");
    let _ = writeln!(out, "Generated: {}", timestamp(generated_at));
    let _ = writeln!(out, "Total Tests: {}", summary.total);
    let _ = writeln!(out, "Passed: {}", summary.passed);
    let _ = writeln!(out, "Failed: {}", summary.failed);
    let _ = writeln!(out, "Success Rate: {:.2}%", summary.success_rate());
    let _ = writeln!(out, "Total Time: {:.0}ms", millis(summary.total_time));

    let failed: Vec<_> = results.iter().filter(|result| !result.passed).collect();
    if !failed.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Failed Tests:");
        for result in failed {
            let _ = writeln!(
                out,
                "- {}: {}",
                result.test_name,
                result.error_message.as_deref().unwrap_or("unknown error")
            );
        }
    }

    out
}

/// Console summary, one `[PASS]`/`[FAIL]` line per result in run order.
pub fn render_console(results: &[TestResult]) -> String {
    let summary = RunSummary::from_results(results);
    let mut out = String::new();

    for result in results {
        let elapsed = format!("({:.0}ms)", millis(result.execution_time)).dimmed();
        if result.passed {
            let _ = writeln!(out, "{} {} {elapsed}", "[PASS]".green().bold(), result.test_name);
        } else {
            let _ = writeln!(out, "{} {} {elapsed}", "[FAIL]".red().bold(), result.test_name.red().bold());
            if let Some(err) = &result.error_message {
                let _ = writeln!(out, "  {} {}", "error:".bold(), err.red());
            }
        }
    }

    let failed = if summary.failed > 0 {
        summary.failed.to_string().red().bold().to_string()
    } else {
        summary.failed.to_string().green().to_string()
    };
    let _ = writeln!(
        out,
        "Total: {}, Passed: {}, Failed: {}, Success Rate: {:.2}%",
        summary.total,
        summary.passed.to_string().green(),
        failed,
        summary.success_rate()
    );

    out
}
