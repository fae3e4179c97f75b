use std::fmt::{self, Display};

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// `None` when the body could not be read.
    pub body: Option<String>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Why a request produced no response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    InvalidUrl,
    DnsError,
    ConnectError,
    TlsError,
    Timeout,
    ReadError,
    Canceled,
}

impl TransportErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportErrorKind::InvalidUrl => "INVALID_URL",
            TransportErrorKind::DnsError => "DNS_ERROR",
            TransportErrorKind::ConnectError => "CONNECT_ERROR",
            TransportErrorKind::TlsError => "TLS_ERROR",
            TransportErrorKind::Timeout => "TIMEOUT",
            TransportErrorKind::ReadError => "READ_ERROR",
            TransportErrorKind::Canceled => "CANCELED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind.as_str())
    }
}
