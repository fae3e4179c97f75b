use serde::Serialize;
use time::OffsetDateTime;

use crate::error::RunError;
use crate::testing::{RunSummary, TestResult};

use super::{millis, timestamp};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportDocument<'a> {
    generated_at: String,
    summary: SummaryDto,
    results: Vec<ResultDto<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDto {
    total: usize,
    passed: usize,
    failed: usize,
    total_execution_time: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultDto<'a> {
    test_name: &'a str,
    passed: bool,
    actual_status_code: Option<u16>,
    expected_status_code: Option<u16>,
    execution_time: f64,
    error_message: Option<&'a str>,
    executed_at: String,
}

impl<'a> From<&'a TestResult> for ResultDto<'a> {
    fn from(result: &'a TestResult) -> Self {
        Self {
            test_name: &result.test_name,
            passed: result.passed,
            actual_status_code: result.actual_status_code,
            expected_status_code: result.expected_status_code,
            execution_time: millis(result.execution_time),
            error_message: result.error_message.as_deref(),
            executed_at: timestamp(result.executed_at),
        }
    }
}

/// `test-results.json`: camelCase keys, times in milliseconds, results in
/// run order.
pub fn render_json(results: &[TestResult], generated_at: OffsetDateTime) -> Result<String, RunError> {
    let summary = RunSummary::from_results(results);
    let document = ReportDocument {
        generated_at: timestamp(generated_at),
        summary: SummaryDto {
            total: summary.total,
            passed: summary.passed,
            failed: summary.failed,
            total_execution_time: millis(summary.total_time),
        },
        results: results.iter().map(ResultDto::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}
