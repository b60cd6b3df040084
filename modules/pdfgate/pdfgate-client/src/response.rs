use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde_json::{Map, Value};

use crate::document::PdfGateDocument;
use crate::error::PdfGateError;
use crate::params::ResponseShape;

/// Decoded body of a successful call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Raw file bytes (possibly empty)
    File(Bytes),
    Document(PdfGateDocument),
    Object(Map<String, Value>),
}

impl ApiResponse {
    /// Shape this response was decoded as
    #[must_use]
    pub const fn shape(&self) -> ResponseShape {
        match self {
            Self::File(_) => ResponseShape::Binary,
            Self::Document(_) => ResponseShape::Document,
            Self::Object(_) => ResponseShape::JsonObject,
        }
    }

    /// File bytes, if this is a binary response
    #[must_use]
    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Self::File(bytes) => Some(bytes),
            Self::Document(_) | Self::Object(_) => None,
        }
    }

    /// Document record, if this is a document response
    #[must_use]
    pub fn into_document(self) -> Option<PdfGateDocument> {
        match self {
            Self::Document(document) => Some(document),
            Self::File(_) | Self::Object(_) => None,
        }
    }

    /// JSON object, if this is a free-form response
    #[must_use]
    pub fn into_object(self) -> Option<Map<String, Value>> {
        match self {
            Self::Object(object) => Some(object),
            Self::File(_) | Self::Document(_) => None,
        }
    }
}

/// Fully buffered transport response, before status checks and decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    #[must_use]
    pub const fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Get the HTTP status code
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the response headers
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the buffered body
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Check the status and decode the body according to `shape`.
    ///
    /// Non-2xx statuses are normalized before any decoding. A binary shape
    /// returns the body verbatim; JSON shapes fail on an empty body.
    ///
    /// # Errors
    /// Returns a [`PdfGateError`] of kind `Status` or `Decode`.
    pub fn decode(self, shape: ResponseShape) -> Result<ApiResponse, PdfGateError> {
        if !self.status.is_success() {
            return Err(PdfGateError::from_status(self.status, self.headers, &self.body));
        }

        match shape {
            ResponseShape::Binary => Ok(ApiResponse::File(self.body)),
            ResponseShape::Document => serde_json::from_slice(&self.body)
                .map(ApiResponse::Document)
                .map_err(PdfGateError::decode),
            ResponseShape::JsonObject => serde_json::from_slice(&self.body)
                .map(ApiResponse::Object)
                .map_err(PdfGateError::decode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentStatus;
    use crate::error::FailureKind;

    fn ok(body: &'static [u8]) -> RawResponse {
        RawResponse::new(StatusCode::OK, HeaderMap::new(), Bytes::from_static(body))
    }

    #[test]
    fn test_binary_body_returned_verbatim() {
        let response = ok(b"%PDF-1.7").decode(ResponseShape::Binary).unwrap();
        assert_eq!(response.shape(), ResponseShape::Binary);
        assert_eq!(response.into_bytes().unwrap(), Bytes::from_static(b"%PDF-1.7"));
    }

    #[test]
    fn test_empty_binary_body_is_zero_length() {
        let bytes = ok(b"").decode(ResponseShape::Binary).unwrap().into_bytes().unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_empty_json_body_is_decode_error() {
        for shape in [ResponseShape::Document, ResponseShape::JsonObject] {
            let err = ok(b"").decode(shape).unwrap_err();
            assert_eq!(err.kind(), FailureKind::Decode);
            assert!(err.status().is_none());
            assert!(std::error::Error::source(&err).is_some());
        }
    }

    #[test]
    fn test_created_document_decoded() {
        let raw = RawResponse::new(
            StatusCode::CREATED,
            HeaderMap::new(),
            Bytes::from_static(
                br#"{"id":"abc123","status":"completed","type":"from_html","size":4096,"createdAt":"2024-01-01T00:00:00Z"}"#,
            ),
        );
        let document = raw.decode(ResponseShape::Document).unwrap().into_document().unwrap();
        assert_eq!(document.id, "abc123");
        assert_eq!(document.status, Some(DocumentStatus::Completed));
        assert_eq!(document.size, Some(4096));
    }

    #[test]
    fn test_object_preserves_values() {
        let object = ok(br#"{"name":"Ada","agree":true,"age":36,"tags":["a"]}"#)
            .decode(ResponseShape::JsonObject)
            .unwrap()
            .into_object()
            .unwrap();
        assert_eq!(object["name"], "Ada");
        assert_eq!(object["agree"], true);
        assert_eq!(object["age"], 36);
        assert_eq!(object["tags"], serde_json::json!(["a"]));
    }

    #[test]
    fn test_json_array_is_not_an_object() {
        let err = ok(b"[1]").decode(ResponseShape::JsonObject).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Decode);
    }

    #[test]
    fn test_error_status_checked_before_decoding() {
        let raw = RawResponse::new(
            StatusCode::BAD_REQUEST,
            HeaderMap::new(),
            Bytes::from_static(br#"{"message":"Required field missing"}"#),
        );
        let err = raw.decode(ResponseShape::Binary).unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(err.message().ends_with("Required field missing"));
    }

    #[test]
    fn test_accessors_narrow_by_shape() {
        let response = ApiResponse::Object(Map::new());
        assert!(response.clone().into_bytes().is_none());
        assert!(response.clone().into_document().is_none());
        assert!(response.into_object().is_some());
    }
}
