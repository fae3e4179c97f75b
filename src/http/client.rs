use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::RunError;
use crate::testing::TestCase;

use super::headers::attach_all;
use super::request::PreparedRequest;
use super::response::{HttpResponse, TransportError, TransportErrorKind};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// HTTP session bound to one base address.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RunError> {
        let base_url = Url::parse(base_url.trim()).map_err(|err| RunError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: err.to_string(),
        })?;

        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(timeout)
            .build()
            .map_err(RunError::Client)?;

        Ok(Self { client, base_url })
    }

    /// Resolve a request target against the base address. Absolute targets
    /// replace it entirely.
    pub fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url.join(path.trim()).map_err(|err| {
            TransportError::new(
                TransportErrorKind::InvalidUrl,
                format!("Invalid request target `{path}`: {err}"),
            )
        })
    }

    pub fn prepare(&self, case: &TestCase) -> Result<PreparedRequest, TransportError> {
        let url = self.resolve(&case.path)?;
        let body = case
            .request_body
            .as_ref()
            .filter(|body| !body.is_empty())
            .cloned();

        let mut headers = attach_all(&case.headers, body.is_some()).into_header_map();
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }

        Ok(PreparedRequest {
            method: case.method,
            url,
            headers,
            body,
        })
    }

    pub async fn send(&self, request: PreparedRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = self
            .client
            .request(request.method.into(), request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|err| {
            TransportError::new(classify_reqwest_error(&err), format!("Request failed: {}", error_chain(&err)))
        })?;

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(text) => Some(text),
            Err(err) => {
                debug!(status, error = %err, "failed to read response body");
                None
            }
        };

        Ok(HttpResponse { status, body })
    }
}

pub fn classify_reqwest_error(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_timeout() {
        return TransportErrorKind::Timeout;
    }

    let message = error_chain(err).to_ascii_lowercase();
    if message.contains("dns") || message.contains("failed to lookup address") {
        return TransportErrorKind::DnsError;
    }
    if message.contains("tls") || message.contains("ssl") || message.contains("certificate") {
        return TransportErrorKind::TlsError;
    }
    if err.is_connect() {
        return TransportErrorKind::ConnectError;
    }
    if err.is_builder() {
        return TransportErrorKind::InvalidUrl;
    }

    TransportErrorKind::ReadError
}

/// The error and all of its sources, joined. reqwest keeps the useful detail
/// (resolver, TLS, socket errors) in the source chain.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::headers::HeaderList;
    use crate::http::method::HttpMethod;
    use crate::testing::TestType;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(base, Duration::from_secs(5)).unwrap()
    }

    fn case(path: &str, body: Option<&str>, headers: HeaderList) -> TestCase {
        TestCase {
            name: "case".to_string(),
            method: HttpMethod::Post,
            path: path.to_string(),
            expected_status_codes: vec![200],
            expected_schema: None,
            test_type: TestType::StatusCode,
            headers,
            request_body: body.map(str::to_string),
        }
    }

    #[test]
    fn rejects_malformed_base_address() {
        let err = HttpClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, RunError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn resolves_relative_and_absolute_targets() {
        let client = client("http://localhost:5225");
        assert_eq!(
            client.resolve("/widgets/42").unwrap().as_str(),
            "http://localhost:5225/widgets/42"
        );
        assert_eq!(
            client.resolve("https://api.example.com/users?page=2").unwrap().as_str(),
            "https://api.example.com/users?page=2"
        );
    }

    #[test]
    fn prepare_attaches_json_content_type_for_bodies() {
        let client = client("http://localhost:5225");
        let headers: HeaderList = [("Content-Type", "text/plain"), ("X-Api-Key", "k")]
            .into_iter()
            .collect();
        let request = client
            .prepare(&case("/items", Some("{\"a\": 1}"), headers))
            .unwrap();

        assert_eq!(request.headers.get(CONTENT_TYPE).unwrap(), JSON_CONTENT_TYPE);
        assert_eq!(request.headers.get("x-api-key").unwrap(), "k");
        assert_eq!(request.body.as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn prepare_without_body_sets_no_content_type() {
        let client = client("http://localhost:5225");
        let request = client.prepare(&case("/items", None, HeaderList::new())).unwrap();
        assert!(request.headers.get(CONTENT_TYPE).is_none());
        assert!(request.body.is_none());
    }
}
