use bytes::Bytes;

use crate::body::MultipartForm;
use crate::error::{ClientError, Result};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// In-memory file uploaded as a multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct FileParam {
    /// File name sent with the part; also used to guess the content type
    pub name: String,
    pub data: Bytes,
    /// Explicit MIME type; guessed from `name` when absent
    pub content_type: Option<String>,
}

impl FileParam {
    #[must_use]
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            content_type: None,
        }
    }

    /// Set an explicit content type
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub(crate) fn validate(&self, label: &str) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ClientError::invalid(format!("{label} name must be provided.")));
        }
        if self.data.is_empty() {
            return Err(ClientError::invalid(format!("{label} data must be provided.")));
        }
        Ok(())
    }

    /// Content type of the part: explicit type, else a guess from the file
    /// name, else `application/octet-stream`.
    pub(crate) fn resolved_content_type(&self) -> Result<String> {
        if let Some(explicit) = self
            .content_type
            .as_deref()
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
        {
            let parsed: mime::Mime = explicit.parse().map_err(|e| {
                ClientError::invalid(format!(
                    "Invalid content type '{explicit}' for file '{}': {e}",
                    self.name
                ))
            })?;
            return Ok(parsed.as_ref().to_owned());
        }

        Ok(mime_guess::from_path(&self.name)
            .first_raw()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_owned())
    }

    pub(crate) fn append_to(&self, form: MultipartForm, field: &str) -> Result<MultipartForm> {
        let content_type = self.resolved_content_type()?;
        Ok(form.file(field, self.name.clone(), content_type, self.data.clone()))
    }
}

impl std::fmt::Debug for FileParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileParam")
            .field("name", &self.name)
            .field("len", &self.data.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Input document of a processing operation: an uploaded file or the id of a
/// document already stored by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    File(FileParam),
    Document(String),
}

impl DocumentSource {
    /// Upload a file
    #[must_use]
    pub const fn file(file: FileParam) -> Self {
        Self::File(file)
    }

    /// Reference a stored document by id
    #[must_use]
    pub fn document(id: impl Into<String>) -> Self {
        Self::Document(id.into())
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Self::File(file) => file.validate("file"),
            Self::Document(id) if id.trim().is_empty() => Err(ClientError::invalid(
                "Either file or documentId must be provided.",
            )),
            Self::Document(_) => Ok(()),
        }
    }

    /// Add the `file` part, or the `documentId` field.
    pub(crate) fn append_to(&self, form: MultipartForm) -> Result<MultipartForm> {
        match self {
            Self::File(file) => file.append_to(form, "file"),
            Self::Document(id) => Ok(form.text("documentId", id.clone())),
        }
    }
}

impl From<FileParam> for DocumentSource {
    fn from(file: FileParam) -> Self {
        Self::File(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::FormPart;

    #[test]
    fn test_content_type_resolution() {
        let explicit = FileParam::new("scan.bin", &b"x"[..]).with_content_type("application/pdf");
        assert_eq!(explicit.resolved_content_type().unwrap(), "application/pdf");

        let guessed = FileParam::new("report.pdf", &b"x"[..]);
        assert_eq!(guessed.resolved_content_type().unwrap(), "application/pdf");

        let png = FileParam::new("logo.png", &b"x"[..]).with_content_type("  ");
        assert_eq!(png.resolved_content_type().unwrap(), "image/png");

        let unknown = FileParam::new("blob", &b"x"[..]);
        assert_eq!(unknown.resolved_content_type().unwrap(), "application/octet-stream");
    }

    #[test]
    fn test_malformed_content_type_rejected() {
        let file = FileParam::new("a.pdf", &b"x"[..]).with_content_type("not a mime");
        assert!(file.resolved_content_type().unwrap_err().is_invalid_usage());
    }

    #[test]
    fn test_source_validation_messages() {
        let blank_name = DocumentSource::file(FileParam::new(" ", &b"x"[..]));
        assert_eq!(
            blank_name.validate().unwrap_err().to_string(),
            "Invalid usage: file name must be provided."
        );

        let empty = DocumentSource::file(FileParam::new("a.pdf", Bytes::new()));
        assert_eq!(
            empty.validate().unwrap_err().to_string(),
            "Invalid usage: file data must be provided."
        );

        let blank_id = DocumentSource::document("");
        assert_eq!(
            blank_id.validate().unwrap_err().to_string(),
            "Invalid usage: Either file or documentId must be provided."
        );

        assert!(DocumentSource::document("doc-1").validate().is_ok());
    }

    #[test]
    fn test_source_appends_file_or_document_id() {
        let form = DocumentSource::document("doc-1")
            .append_to(MultipartForm::new())
            .unwrap();
        assert_eq!(form.text_value("documentId"), Some("doc-1"));

        let form = DocumentSource::from(FileParam::new("in.pdf", &b"%PDF"[..]))
            .append_to(MultipartForm::new())
            .unwrap();
        let Some(FormPart::File {
            file_name,
            content_type,
            data,
            ..
        }) = form.get("file")
        else {
            panic!("file part missing");
        };
        assert_eq!(file_name, "in.pdf");
        assert_eq!(content_type, "application/pdf");
        assert_eq!(&data[..], b"%PDF");
        assert!(form.get("documentId").is_none());
    }
}
