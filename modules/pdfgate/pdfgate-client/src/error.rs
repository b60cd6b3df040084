//! Error types for the PDFGate client
//!
//! Every remote, transport and decode failure is normalized into a single
//! [`PdfGateError`]. Local misuse (bad parameters, bad configuration, a call
//! executed twice) is reported separately as [`ClientError::InvalidUsage`] so
//! callers can tell programmer errors apart from service or network failures.

use std::error::Error as StdError;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use thiserror::Error;

const SERVICE_NAME: &str = "PdfGate API";

/// Boxed error used as the diagnostic cause of a normalized error.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Which stage of a call produced a [`PdfGateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The service answered with a non-2xx status.
    Status,
    /// The request never produced a complete response (connect, timeout, I/O).
    Transport,
    /// A 2xx response body did not match the expected shape.
    Decode,
}

/// Normalized failure of a PDFGate API call.
///
/// `status` is `None` when no HTTP status was received; that is the
/// "unavailable" sentinel used for transport and decode failures.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct PdfGateError {
    kind: FailureKind,
    status: Option<StatusCode>,
    body: String,
    headers: HeaderMap,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl PdfGateError {
    /// Build an error from a non-2xx response.
    ///
    /// If the body is a JSON object with a `message` field, that field is the
    /// detail; otherwise the raw body text is used verbatim.
    #[must_use]
    pub fn from_status(status: StatusCode, headers: HeaderMap, body: &Bytes) -> Self {
        let body = String::from_utf8_lossy(body).into_owned();
        let detail = error_message_from_body(&body)
            .filter(|detail| !detail.is_empty())
            .unwrap_or_else(|| body.clone());

        Self {
            kind: FailureKind::Status,
            status: Some(status),
            message: format!(
                "{SERVICE_NAME} request failed with status {}: {detail}",
                status.as_u16()
            ),
            body,
            headers,
            source: None,
        }
    }

    /// Build an error for a request that never produced a usable response.
    pub fn transport(cause: impl Into<BoxError>) -> Self {
        Self::without_status(FailureKind::Transport, cause.into())
    }

    /// Build an error for a 2xx response whose body could not be decoded.
    pub fn decode(cause: impl Into<BoxError>) -> Self {
        Self::without_status(FailureKind::Decode, cause.into())
    }

    fn without_status(kind: FailureKind, cause: BoxError) -> Self {
        let mut detail = cause.to_string();
        if detail.trim().is_empty() {
            detail = match kind {
                FailureKind::Decode => "decode error".to_owned(),
                FailureKind::Status | FailureKind::Transport => "transport error".to_owned(),
            };
        }

        Self {
            kind,
            status: None,
            body: String::new(),
            headers: HeaderMap::new(),
            message: format!("{SERVICE_NAME} request failed: {detail}"),
            source: Some(cause),
        }
    }

    /// Stage of the call that failed
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    /// HTTP status, or `None` when the service was unavailable
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Whether no HTTP status was received
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        self.status.is_none()
    }

    /// Raw response body text (empty for transport and decode failures)
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Response headers (empty for transport and decode failures)
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Human-readable message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the underlying transport failure was a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.reqwest_cause().is_some_and(reqwest::Error::is_timeout)
    }

    /// Whether the underlying transport failure happened while connecting.
    #[must_use]
    pub fn is_connect(&self) -> bool {
        self.reqwest_cause().is_some_and(reqwest::Error::is_connect)
    }

    fn reqwest_cause(&self) -> Option<&reqwest::Error> {
        self.source.as_deref().and_then(|cause| cause.downcast_ref())
    }
}

/// Extract the `message` field of a JSON error body, if there is one.
fn error_message_from_body(body: &str) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    let serde_json::Value::Object(object) = serde_json::from_str::<serde_json::Value>(body).ok()? else {
        return None;
    };
    match object.get("message")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

/// Error type for PDFGate client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Local misuse detected before any network I/O.
    ///
    /// Returned for incomplete or malformed parameters, invalid
    /// configuration or API keys, and calls executed more than once.
    #[error("Invalid usage: {0}")]
    InvalidUsage(String),

    /// Normalized remote, transport or decode failure
    #[error(transparent)]
    Api(#[from] PdfGateError),

    /// The call was cancelled before it completed
    #[error("Call was cancelled")]
    Cancelled,
}

impl ClientError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidUsage(message.into())
    }

    /// Check if this is a local usage error
    #[must_use]
    pub const fn is_invalid_usage(&self) -> bool {
        matches!(self, Self::InvalidUsage(_))
    }

    /// Check if the call was cancelled
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if the service answered with a non-2xx status
    #[must_use]
    pub fn is_status(&self) -> bool {
        self.api_kind() == Some(FailureKind::Status)
    }

    /// Check if the call failed in transport
    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.api_kind() == Some(FailureKind::Transport)
    }

    /// Check if a 2xx body could not be decoded
    #[must_use]
    pub fn is_decode(&self) -> bool {
        self.api_kind() == Some(FailureKind::Decode)
    }

    /// HTTP status if the service answered with an error status
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.as_api().and_then(PdfGateError::status)
    }

    /// The normalized error, if this is one
    #[must_use]
    pub const fn as_api(&self) -> Option<&PdfGateError> {
        match self {
            Self::Api(err) => Some(err),
            Self::InvalidUsage(_) | Self::Cancelled => None,
        }
    }

    fn api_kind(&self) -> Option<FailureKind> {
        self.as_api().map(PdfGateError::kind)
    }
}

/// Result type alias for PDFGate client operations
pub type Result<T> = std::result::Result<T, ClientError>;
