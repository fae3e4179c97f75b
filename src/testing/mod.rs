//! # Testing
//!
//! Test cases parsed from request-definition files, the results of running
//! them, and the engine that runs them.

pub mod runner;
pub mod validator;

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::time::Duration;

use time::OffsetDateTime;

use crate::http::headers::HeaderList;
use crate::http::method::HttpMethod;

pub const DEFAULT_STATUS_CODE: u16 = 200;

/// How a response is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestType {
    #[default]
    StatusCode,
    Schema,
    /// Reserved; never produced by the parser.
    Performance,
    /// Reserved; never produced by the parser.
    Security,
}

impl Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TestType::StatusCode => "status_code",
            TestType::Schema => "schema",
            TestType::Performance => "performance",
            TestType::Security => "security",
        };
        write!(f, "{label}")
    }
}

/// One executable request plus its expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    /// Never empty; the first entry is the one shown in reports.
    pub expected_status_codes: Vec<u16>,
    pub expected_schema: Option<String>,
    pub test_type: TestType,
    pub headers: HeaderList,
    pub request_body: Option<String>,
}

impl TestCase {
    /// A status-code case expecting `200`.
    pub fn new(name: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            expected_status_codes: vec![DEFAULT_STATUS_CODE],
            expected_schema: None,
            test_type: TestType::StatusCode,
            headers: HeaderList::new(),
            request_body: None,
        }
    }

    /// Replace the expected set. Duplicates are dropped keeping first
    /// occurrence; an empty set falls back to `200`.
    pub fn with_expected_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        let mut expected: Vec<u16> = Vec::new();
        for code in codes {
            if !expected.contains(&code) {
                expected.push(code);
            }
        }
        if expected.is_empty() {
            expected.push(DEFAULT_STATUS_CODE);
        }
        self.expected_status_codes = expected;
        self
    }

    /// Switch the case to schema evaluation.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.expected_schema = Some(schema.into());
        self.test_type = TestType::Schema;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.request_body = Some(body.into());
        self
    }

    pub fn primary_status_code(&self) -> u16 {
        self.expected_status_codes
            .first()
            .copied()
            .unwrap_or(DEFAULT_STATUS_CODE)
    }
}

/// Outcome of executing one test case.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub test_name: String,
    pub passed: bool,
    /// Absent when no response was received.
    pub actual_status_code: Option<u16>,
    pub expected_status_code: Option<u16>,
    /// Present iff the case failed.
    pub error_message: Option<String>,
    pub response_content: Option<String>,
    pub execution_time: Duration,
    pub executed_at: OffsetDateTime,
    pub metadata: BTreeMap<String, String>,
}

/// Totals over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub total_time: Duration,
}

impl RunSummary {
    pub fn from_results(results: &[TestResult]) -> Self {
        let passed = results.iter().filter(|result| result.passed).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            total_time: results.iter().map(|result| result.execution_time).sum(),
        }
    }

    /// Percentage of passed cases, `0.0` for an empty run.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.passed as f64 * 100.0 / self.total as f64
    }

    pub fn all_passed(&self) -> bool {
        self.total > 0 && self.failed == 0
    }
}
