use reqwest::Url;
use reqwest::header::HeaderMap;

use super::method::HttpMethod;

/// A test case resolved against the base address, ready to send.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
}
