//! Operation parameters
//!
//! One plain record per operation. Each record carries the response shape the
//! caller expects and knows how to validate and encode itself; nothing here
//! performs I/O.

mod forms;
mod generate;
mod retrieve;
mod source;
mod transform;
mod watermark;

use std::fmt;

use serde_json::Value;

use crate::body::{MultipartForm, RequestBody};
use crate::endpoint::Operation;
use crate::error::{ClientError, Result};

pub use forms::ExtractPdfFormDataParams;
pub use generate::{
    ClickSelectorChain, ClickSelectorChainSetup, EmulateMediaType, FileOrientation,
    GeneratePdfAuthentication, GeneratePdfParams, PageSizeType, PdfPageMargin, Viewport,
};
pub use retrieve::{GetDocumentParams, GetFileParams};
pub use source::{DocumentSource, FileParam};
pub use transform::{CompressPdfParams, EncryptionAlgorithm, FlattenPdfParams, ProtectPdfParams};
pub use watermark::{WatermarkPdfParams, WatermarkType};

/// How the body of a successful response is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResponseShape {
    /// Raw bytes of the produced file
    #[default]
    Binary,
    /// JSON description of the stored document
    Document,
    /// Free-form JSON object
    JsonObject,
}

impl ResponseShape {
    /// Whether the service is asked for a JSON body (`jsonResponse` on the wire)
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Document | Self::JsonObject)
    }
}

impl fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => f.write_str("binary"),
            Self::Document => f.write_str("document"),
            Self::JsonObject => f.write_str("JSON object"),
        }
    }
}

/// Operation-specific part of an encoded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub(crate) resource: Option<String>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: RequestBody,
}

impl EncodedPayload {
    pub(crate) fn from_body(body: impl Into<RequestBody>) -> Self {
        Self {
            resource: None,
            query: Vec::new(),
            body: body.into(),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Parameters of one service operation.
///
/// Implemented by the parameter records of this crate only.
pub trait ApiOperation: sealed::Sealed {
    /// Operation addressed by these parameters
    fn operation(&self) -> Operation;

    /// Shape the response body is decoded into
    fn response_shape(&self) -> ResponseShape;

    /// Validate and encode into the operation-specific request parts.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] when required fields are missing
    /// or malformed. No request is built in that case.
    fn encode(self) -> Result<EncodedPayload>;
}

/// Wire value of the `metadata` field: strings are sent as-is, anything else
/// as serialized JSON.
fn metadata_value(metadata: &Value) -> Result<String> {
    match metadata {
        Value::String(raw) => Ok(raw.clone()),
        other => serde_json::to_string(other)
            .map_err(|e| ClientError::invalid(format!("Failed to serialize metadata: {e}"))),
    }
}

/// Fields shared by every document-producing multipart operation.
fn append_output_fields(
    form: MultipartForm,
    shape: ResponseShape,
    pre_signed_url_expires_in: Option<u64>,
    metadata: Option<&Value>,
) -> Result<MultipartForm> {
    let form = form
        .text("jsonResponse", shape.is_json().to_string())
        .text_opt("preSignedUrlExpiresIn", pre_signed_url_expires_in);
    Ok(match metadata {
        Some(metadata) => form.text("metadata", metadata_value(metadata)?),
        None => form,
    })
}
