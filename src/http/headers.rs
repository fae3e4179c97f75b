//! Header list carried by a test case, and the two-tier attachment of those
//! headers onto an outgoing request.
//!
//! Protocol-level headers go straight onto the request. Names in
//! [`CONTENT_HEADERS`] describe the payload and can only be attached when the
//! request carries a body. `Content-Type` is never taken from the list since
//! the JSON body already implies it.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

/// Names that belong to the payload rather than the request itself.
pub const CONTENT_HEADERS: [&str; 10] = [
    "allow",
    "content-disposition",
    "content-encoding",
    "content-language",
    "content-length",
    "content-location",
    "content-md5",
    "content-range",
    "expires",
    "last-modified",
];

const IMPLIED_HEADER: &str = "content-type";

/// Ordered header list with case-insensitive names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    entries: Vec<(String, String)>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing the value of an existing entry with the
    /// same name while keeping its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderList {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = HeaderList::new();
        for (name, value) in iter {
            list.insert(name, value);
        }
        list
    }
}

/// Where a header ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Request,
    Content,
    Skipped,
    Dropped(String),
}

/// Headers split by slot, ready to be merged onto a request.
#[derive(Debug, Default)]
pub struct AttachedHeaders {
    pub request: HeaderMap,
    pub content: HeaderMap,
}

impl AttachedHeaders {
    pub fn into_header_map(self) -> HeaderMap {
        let mut merged = self.request;
        for (name, value) in self.content.iter() {
            merged.append(name.clone(), value.clone());
        }
        merged
    }
}

pub fn is_content_header(name: &str) -> bool {
    CONTENT_HEADERS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(name))
}

/// Attach one header, falling back to the content slot for restricted names.
/// Never fails; a header that fits neither slot is reported as dropped.
pub fn attach_header(
    attached: &mut AttachedHeaders,
    name: &str,
    value: &str,
    has_body: bool,
) -> Attachment {
    if name.eq_ignore_ascii_case(IMPLIED_HEADER) {
        return Attachment::Skipped;
    }

    let header_name = match HeaderName::from_bytes(name.as_bytes()) {
        Ok(header_name) => header_name,
        Err(err) => return Attachment::Dropped(format!("Invalid header name `{name}`: {err}")),
    };
    let header_value = match HeaderValue::from_str(value) {
        Ok(header_value) => header_value,
        Err(err) => return Attachment::Dropped(format!("Invalid header value for `{name}`: {err}")),
    };

    if !is_content_header(name) {
        attached.request.append(header_name, header_value);
        return Attachment::Request;
    }

    if has_body {
        attached.content.append(header_name, header_value);
        Attachment::Content
    } else {
        Attachment::Dropped(format!("Content header `{name}` requires a request body"))
    }
}

/// Attach every header of a test case.
pub fn attach_all(headers: &HeaderList, has_body: bool) -> AttachedHeaders {
    let mut attached = AttachedHeaders::default();
    for (name, value) in headers.iter() {
        match attach_header(&mut attached, name, value, has_body) {
            Attachment::Request | Attachment::Skipped => {}
            Attachment::Content => debug!(header = name, "attached as content header"),
            Attachment::Dropped(reason) => debug!(header = name, %reason, "header dropped"),
        }
    }
    attached
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_case_insensitively() {
        let mut headers = HeaderList::new();
        headers.insert("Accept", "text/plain");
        headers.insert("X-Trace", "1");
        headers.insert("accept", "application/json");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("ACCEPT"), Some("application/json"));
        assert_eq!(headers.iter().next(), Some(("Accept", "application/json")));
    }

    #[test]
    fn content_type_is_always_skipped() {
        let mut attached = AttachedHeaders::default();
        let outcome = attach_header(&mut attached, "content-type", "text/xml", true);
        assert_eq!(outcome, Attachment::Skipped);
        assert!(attached.request.is_empty());
        assert!(attached.content.is_empty());
    }

    #[test]
    fn restricted_names_fall_back_to_content_slot() {
        let mut attached = AttachedHeaders::default();
        assert_eq!(
            attach_header(&mut attached, "Authorization", "Bearer abc", true),
            Attachment::Request
        );
        assert_eq!(
            attach_header(&mut attached, "Content-Language", "pt-BR", true),
            Attachment::Content
        );
        assert_eq!(attached.request.get("authorization").unwrap(), "Bearer abc");
        assert_eq!(attached.content.get("content-language").unwrap(), "pt-BR");
    }

    #[test]
    fn content_header_without_body_is_dropped() {
        let mut attached = AttachedHeaders::default();
        let outcome = attach_header(&mut attached, "Expires", "0", false);
        assert!(matches!(outcome, Attachment::Dropped(_)));
        assert!(attached.content.is_empty());
    }

    #[test]
    fn invalid_names_and_values_are_dropped() {
        let mut attached = AttachedHeaders::default();
        assert!(matches!(
            attach_header(&mut attached, "Bad Header", "x", false),
            Attachment::Dropped(_)
        ));
        assert!(matches!(
            attach_header(&mut attached, "X-Line", "a\nb", false),
            Attachment::Dropped(_)
        ));
        assert!(attached.into_header_map().is_empty());
    }
}
