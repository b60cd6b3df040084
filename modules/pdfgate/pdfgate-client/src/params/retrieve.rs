use super::{ApiOperation, EncodedPayload, ResponseShape, sealed};
use crate::body::RequestBody;
use crate::endpoint::Operation;
use crate::error::{ClientError, Result};

fn require_document_id(document_id: &str) -> Result<()> {
    if document_id.trim().is_empty() {
        return Err(ClientError::invalid("documentId must be provided."));
    }
    Ok(())
}

/// Parameters for fetching the metadata of a stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDocumentParams {
    pub document_id: String,
    /// Lifetime in seconds of the returned `fileUrl`
    pub pre_signed_url_expires_in: Option<u64>,
}

impl GetDocumentParams {
    #[must_use]
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            pre_signed_url_expires_in: None,
        }
    }

    /// Request a pre-signed download URL valid for the given number of seconds
    #[must_use]
    pub const fn with_pre_signed_url_expires_in(mut self, seconds: u64) -> Self {
        self.pre_signed_url_expires_in = Some(seconds);
        self
    }
}

impl sealed::Sealed for GetDocumentParams {}

impl ApiOperation for GetDocumentParams {
    fn operation(&self) -> Operation {
        Operation::GetDocument
    }

    fn response_shape(&self) -> ResponseShape {
        ResponseShape::Document
    }

    fn encode(self) -> Result<EncodedPayload> {
        require_document_id(&self.document_id)?;
        let query = self
            .pre_signed_url_expires_in
            .map(|seconds| ("preSignedUrlExpiresIn".to_owned(), seconds.to_string()))
            .into_iter()
            .collect();
        Ok(EncodedPayload {
            resource: Some(self.document_id),
            query,
            body: RequestBody::Empty,
        })
    }
}

/// Parameters for downloading the raw bytes of a stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetFileParams {
    pub document_id: String,
}

impl GetFileParams {
    #[must_use]
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
        }
    }
}

impl sealed::Sealed for GetFileParams {}

impl ApiOperation for GetFileParams {
    fn operation(&self) -> Operation {
        Operation::GetFile
    }

    fn response_shape(&self) -> ResponseShape {
        ResponseShape::Binary
    }

    fn encode(self) -> Result<EncodedPayload> {
        require_document_id(&self.document_id)?;
        Ok(EncodedPayload {
            resource: Some(self.document_id),
            query: Vec::new(),
            body: RequestBody::Empty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_document_payload() {
        let payload = GetDocumentParams::new("doc-1")
            .with_pre_signed_url_expires_in(60)
            .encode()
            .unwrap();
        assert_eq!(payload.resource.as_deref(), Some("doc-1"));
        assert_eq!(
            payload.query,
            [("preSignedUrlExpiresIn".to_owned(), "60".to_owned())]
        );
        assert!(payload.body.is_empty());
    }

    #[test]
    fn test_get_file_payload() {
        let params = GetFileParams::new("doc-2");
        assert_eq!(params.response_shape(), ResponseShape::Binary);
        let payload = params.encode().unwrap();
        assert_eq!(payload.resource.as_deref(), Some("doc-2"));
        assert!(payload.query.is_empty());
    }

    #[test]
    fn test_blank_id_rejected() {
        assert!(GetFileParams::new(" ").encode().unwrap_err().is_invalid_usage());
        assert!(GetDocumentParams::new("").encode().unwrap_err().is_invalid_usage());
    }
}
