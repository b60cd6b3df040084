use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::{
    ApiOperation, DocumentSource, EncodedPayload, ResponseShape, append_output_fields, sealed,
};
use crate::body::MultipartForm;
use crate::endpoint::Operation;
use crate::error::Result;

/// Parameters for flattening form fields and annotations into page content.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenPdfParams {
    pub source: DocumentSource,
    pub response: ResponseShape,
    pub pre_signed_url_expires_in: Option<u64>,
    pub metadata: Option<Value>,
}

impl FlattenPdfParams {
    #[must_use]
    pub fn new(source: impl Into<DocumentSource>) -> Self {
        Self {
            source: source.into(),
            response: ResponseShape::default(),
            pre_signed_url_expires_in: None,
            metadata: None,
        }
    }

    /// Set the expected response shape
    #[must_use]
    pub fn with_response(mut self, response: ResponseShape) -> Self {
        self.response = response;
        self
    }
}

impl sealed::Sealed for FlattenPdfParams {}

impl ApiOperation for FlattenPdfParams {
    fn operation(&self) -> Operation {
        Operation::FlattenPdf
    }

    fn response_shape(&self) -> ResponseShape {
        self.response
    }

    fn encode(self) -> Result<EncodedPayload> {
        self.source.validate()?;
        let form = append_output_fields(
            MultipartForm::new(),
            self.response,
            self.pre_signed_url_expires_in,
            self.metadata.as_ref(),
        )?;
        Ok(EncodedPayload::from_body(self.source.append_to(form)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EncryptionAlgorithm {
    #[serde(rename = "AES256")]
    Aes256,
    #[serde(rename = "AES128")]
    Aes128,
}

impl fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aes256 => f.write_str("AES256"),
            Self::Aes128 => f.write_str("AES128"),
        }
    }
}

/// Parameters for encrypting a PDF and restricting what readers may do.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtectPdfParams {
    pub source: DocumentSource,
    pub response: ResponseShape,
    pub algorithm: Option<EncryptionAlgorithm>,
    /// Password required to open the document
    pub user_password: Option<String>,
    /// Password that lifts the restrictions
    pub owner_password: Option<String>,
    pub disable_print: Option<bool>,
    pub disable_copy: Option<bool>,
    pub disable_editing: Option<bool>,
    pub encrypt_metadata: Option<bool>,
    pub pre_signed_url_expires_in: Option<u64>,
    pub metadata: Option<Value>,
}

impl ProtectPdfParams {
    #[must_use]
    pub fn new(source: impl Into<DocumentSource>) -> Self {
        Self {
            source: source.into(),
            response: ResponseShape::default(),
            algorithm: None,
            user_password: None,
            owner_password: None,
            disable_print: None,
            disable_copy: None,
            disable_editing: None,
            encrypt_metadata: None,
            pre_signed_url_expires_in: None,
            metadata: None,
        }
    }

    /// Set the expected response shape
    #[must_use]
    pub fn with_response(mut self, response: ResponseShape) -> Self {
        self.response = response;
        self
    }
}

impl sealed::Sealed for ProtectPdfParams {}

impl ApiOperation for ProtectPdfParams {
    fn operation(&self) -> Operation {
        Operation::ProtectPdf
    }

    fn response_shape(&self) -> ResponseShape {
        self.response
    }

    fn encode(self) -> Result<EncodedPayload> {
        self.source.validate()?;
        let form = MultipartForm::new()
            .text_opt("algorithm", self.algorithm)
            .text_opt("userPassword", self.user_password)
            .text_opt("ownerPassword", self.owner_password)
            .text_opt("disablePrint", self.disable_print)
            .text_opt("disableCopy", self.disable_copy)
            .text_opt("disableEditing", self.disable_editing)
            .text_opt("encryptMetadata", self.encrypt_metadata);
        let form = append_output_fields(
            form,
            self.response,
            self.pre_signed_url_expires_in,
            self.metadata.as_ref(),
        )?;
        Ok(EncodedPayload::from_body(self.source.append_to(form)?))
    }
}

/// Parameters for reducing the size of a PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressPdfParams {
    pub source: DocumentSource,
    pub response: ResponseShape,
    /// Optimize for fast web view
    pub linearize: Option<bool>,
    pub pre_signed_url_expires_in: Option<u64>,
    pub metadata: Option<Value>,
}

impl CompressPdfParams {
    #[must_use]
    pub fn new(source: impl Into<DocumentSource>) -> Self {
        Self {
            source: source.into(),
            response: ResponseShape::default(),
            linearize: None,
            pre_signed_url_expires_in: None,
            metadata: None,
        }
    }

    /// Set the expected response shape
    #[must_use]
    pub fn with_response(mut self, response: ResponseShape) -> Self {
        self.response = response;
        self
    }
}

impl sealed::Sealed for CompressPdfParams {}

impl ApiOperation for CompressPdfParams {
    fn operation(&self) -> Operation {
        Operation::CompressPdf
    }

    fn response_shape(&self) -> ResponseShape {
        self.response
    }

    fn encode(self) -> Result<EncodedPayload> {
        self.source.validate()?;
        let form = MultipartForm::new().text_opt("linearize", self.linearize);
        let form = append_output_fields(
            form,
            self.response,
            self.pre_signed_url_expires_in,
            self.metadata.as_ref(),
        )?;
        Ok(EncodedPayload::from_body(self.source.append_to(form)?))
    }
}
