use bytes::Bytes;
use serde::Serialize;

use crate::error::ClientError;

/// Request body of an encoded call.
///
/// Kept as plain data so a call can be cloned and re-materialized into an
/// identical transport request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    /// No body (GET operations)
    #[default]
    Empty,
    /// Serialized JSON document
    Json(Bytes),
    /// `multipart/form-data` parts
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Create a body from a JSON-serializable value
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] if the value cannot be serialized.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ClientError> {
        let json = serde_json::to_vec(value)
            .map_err(|e| ClientError::invalid(format!("Failed to serialize request body: {e}")))?;
        Ok(Self::Json(Bytes::from(json)))
    }

    /// Check if body is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<MultipartForm> for RequestBody {
    fn from(form: MultipartForm) -> Self {
        Self::Multipart(form)
    }
}

/// One named part of a multipart form.
#[derive(Clone, PartialEq, Eq)]
pub enum FormPart {
    /// Plain text field
    Text { name: String, value: String },
    /// Binary file part
    File {
        name: String,
        file_name: String,
        content_type: String,
        data: Bytes,
    },
}

impl FormPart {
    /// Field name of the part
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name, .. } | Self::File { name, .. } => name,
        }
    }
}

impl std::fmt::Debug for FormPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text { name, value } => f
                .debug_struct("FormPart::Text")
                .field("name", name)
                .field("value", value)
                .finish(),
            Self::File {
                name,
                file_name,
                content_type,
                data,
            } => f
                .debug_struct("FormPart::File")
                .field("name", name)
                .field("file_name", file_name)
                .field("content_type", content_type)
                .field("len", &data.len())
                .finish(),
        }
    }
}

/// Ordered list of multipart form parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    /// Create an empty form
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Add a text field if the value is present, stringifying it
    #[must_use]
    pub fn text_opt<T: ToString>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.text(name, value.to_string()),
            None => self,
        }
    }

    /// Add a binary file part
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Bytes,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        });
        self
    }

    /// Parts in insertion order
    #[must_use]
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// First part with the given field name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FormPart> {
        self.parts.iter().find(|part| part.name() == name)
    }

    /// Value of a text field
    #[must_use]
    pub fn text_value(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FormPart::Text { value, .. } => Some(value),
            FormPart::File { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body() {
        let body = RequestBody::json(&serde_json::json!({"html": "<p>hi</p>"})).unwrap();
        assert_eq!(
            body,
            RequestBody::Json(Bytes::from_static(br#"{"html":"<p>hi</p>"}"#))
        );
        assert!(!body.is_empty());
        assert!(RequestBody::default().is_empty());
    }

    #[test]
    fn test_form_skips_absent_values() {
        let form = MultipartForm::new()
            .text_opt("linearize", Some(true))
            .text_opt::<u64>("preSignedUrlExpiresIn", None)
            .text_opt("opacity", Some(0.5));

        assert_eq!(form.parts().len(), 2);
        assert_eq!(form.text_value("linearize"), Some("true"));
        assert_eq!(form.text_value("opacity"), Some("0.5"));
        assert!(form.get("preSignedUrlExpiresIn").is_none());
    }

    #[test]
    fn test_file_part_debug_hides_content() {
        let form = MultipartForm::new().file(
            "file",
            "input.pdf",
            "application/pdf",
            Bytes::from_static(b"%PDF-1.7"),
        );
        let debug = format!("{:?}", form.get("file").unwrap());
        assert!(debug.contains("len: 8"));
        assert!(!debug.contains("PDF-1.7"));
        assert_eq!(form.text_value("file"), None);
    }
}
