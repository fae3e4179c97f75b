//! Executes test cases against a live API and judges the responses.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use time::OffsetDateTime;
use tracing::{debug, info};

use crate::error::RunError;
use crate::http::client::HttpClient;
use crate::http::response::{HttpResponse, TransportError};

use super::{TestCase, TestResult, TestType};

pub const METADATA_METHOD: &str = "method";
pub const METADATA_URL: &str = "url";
pub const METADATA_TRANSPORT_ERROR: &str = "transport_error";

/// Pass or fail with the reason; `None` means passed.
type Verdict = Option<String>;

#[derive(Debug, Clone)]
pub struct ContractValidator {
    client: HttpClient,
}

impl ContractValidator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RunError> {
        Ok(Self {
            client: HttpClient::new(base_url, timeout)?,
        })
    }

    /// Run one case. Always produces a result; transport problems become a
    /// failed result rather than an error.
    pub async fn execute_test(&self, case: &TestCase) -> TestResult {
        let executed_at = OffsetDateTime::now_utc();
        let started = Instant::now();

        let mut metadata = BTreeMap::new();
        metadata.insert(METADATA_METHOD.to_string(), case.method.to_string());

        let outcome = match self.client.prepare(case) {
            Ok(request) => {
                metadata.insert(METADATA_URL.to_string(), request.url.to_string());
                self.client.send(request).await
            }
            Err(err) => {
                metadata.insert(METADATA_URL.to_string(), case.path.clone());
                Err(err)
            }
        };
        let execution_time = started.elapsed();

        let mut result = TestResult {
            test_name: case.name.clone(),
            passed: false,
            actual_status_code: None,
            expected_status_code: Some(case.primary_status_code()),
            error_message: None,
            response_content: None,
            execution_time,
            executed_at,
            metadata,
        };

        match outcome {
            Ok(response) => {
                let verdict = evaluate(case, &response);
                result.actual_status_code = Some(response.status);
                result.response_content = response.body;
                result.passed = verdict.is_none();
                result.error_message = verdict;
            }
            Err(err) => record_transport_failure(&mut result, err),
        }

        info!(
            test = %result.test_name,
            passed = result.passed,
            status = ?result.actual_status_code,
            elapsed_ms = result.execution_time.as_millis() as u64,
            "test executed"
        );

        result
    }

    /// Run every case one after another, in input order.
    pub async fn execute_tests(&self, cases: &[TestCase]) -> Vec<TestResult> {
        let mut results = Vec::with_capacity(cases.len());
        for case in cases {
            results.push(self.execute_test(case).await);
        }
        results
    }
}

fn record_transport_failure(result: &mut TestResult, err: TransportError) {
    debug!(test = %result.test_name, kind = err.kind.as_str(), "transport failure");
    result
        .metadata
        .insert(METADATA_TRANSPORT_ERROR.to_string(), err.kind.as_str().to_string());
    result.error_message = Some(err.to_string());
}

fn evaluate(case: &TestCase, response: &HttpResponse) -> Verdict {
    match case.test_type {
        TestType::StatusCode => evaluate_status(&case.expected_status_codes, response.status),
        TestType::Schema => evaluate_schema(case, response),
        TestType::Performance | TestType::Security => {
            Some(format!("Unsupported test type: {}", case.test_type))
        }
    }
}

pub fn evaluate_status(expected: &[u16], actual: u16) -> Option<String> {
    if expected.contains(&actual) {
        return None;
    }
    let listed = expected
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("Expected status codes: {listed}, but got: {actual}"))
}

/// Only syntax is checked: a 2xx body must parse as JSON. A missing schema
/// hint or an empty body passes.
fn evaluate_schema(case: &TestCase, response: &HttpResponse) -> Verdict {
    if !response.is_success() {
        return Some(format!(
            "Schema validation requires a success response, but got: {}",
            response.status
        ));
    }

    let has_schema = case
        .expected_schema
        .as_deref()
        .is_some_and(|schema| !schema.trim().is_empty());
    let body = response.body.as_deref().unwrap_or_default();
    if !has_schema || body.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(_) => None,
        Err(err) => Some(format!("Response schema validation failed: {err}")),
    }
}
