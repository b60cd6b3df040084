//! PDFGate API client
//!
//! Typed client for the PDFGate document-processing service: PDF generation
//! from HTML or URLs, flattening, protection, compression, watermarking, form
//! data extraction and retrieval of stored documents.
//!
//! Every operation goes through the same pipeline:
//!
//! - parameters are validated and encoded into a [`PendingCall`] (JSON body
//!   for generation, `multipart/form-data` for everything that uploads a file)
//! - the call is executed once: awaited, blocking, or enqueued with callbacks
//! - the response is decoded according to its [`ResponseShape`]: raw bytes, a
//!   [`PdfGateDocument`], or a free-form JSON object
//!
//! Remote, transport and decode failures all surface as one [`PdfGateError`];
//! local misuse is reported as [`ClientError::InvalidUsage`] before any I/O.
//!
//! # Examples
//!
//! ## Async Usage
//!
//! ```no_run
//! use pdfgate_client::{GeneratePdfParams, PdfGateClient, ResponseShape};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PdfGateClient::new("test_your_api_key")?;
//!
//! let params = GeneratePdfParams::from_html("<h1>Invoice #42</h1>")
//!     .with_response(ResponseShape::Document);
//! if let Some(document) = client.generate_pdf(params).await?.into_document() {
//!     println!("stored as {}", document.id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Blocking Usage
//!
//! ```no_run
//! use pdfgate_client::{FileParam, FlattenPdfParams, PdfGateClient};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PdfGateClient::from_env()?;
//!
//! let file = FileParam::new("form.pdf", std::fs::read("form.pdf")?);
//! let flattened = client.flatten_pdf_blocking(FlattenPdfParams::new(file))?;
//! std::fs::write("flattened.pdf", flattened.into_bytes().unwrap_or_default())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Callbacks and Cancellation
//!
//! ```no_run
//! use pdfgate_client::{GetFileParams, PdfGateClient};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PdfGateClient::from_env()?;
//! let call = client.prepare(GetFileParams::new("6642381c5c61"))?;
//!
//! call.enqueue(
//!     |response| println!("downloaded {} bytes", response.into_bytes().unwrap_or_default().len()),
//!     |error| eprintln!("download failed: {error}"),
//! )?;
//! call.cancel();
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod body;
mod call;
mod client;
mod config;
mod document;
mod encoder;
mod endpoint;
mod error;
mod params;
mod request;
mod response;
mod runtime;
mod transport;

// Re-export public API
pub use body::{FormPart, MultipartForm, RequestBody};
pub use call::{CallFuture, CallPhase, PendingCall};
pub use client::PdfGateClient;
pub use config::PdfGateConfig;
pub use document::{DocumentStatus, DocumentType, PdfGateDocument};
pub use endpoint::{EndpointResolver, Environment, Operation};
pub use error::{BoxError, ClientError, FailureKind, PdfGateError, Result};
pub use params::{
    ApiOperation, ClickSelectorChain, ClickSelectorChainSetup, CompressPdfParams, DocumentSource,
    EmulateMediaType, EncodedPayload, EncryptionAlgorithm, ExtractPdfFormDataParams,
    FileOrientation, FileParam, FlattenPdfParams, GeneratePdfAuthentication, GeneratePdfParams,
    GetDocumentParams, GetFileParams, PageSizeType, PdfPageMargin, ProtectPdfParams,
    ResponseShape, Viewport, WatermarkPdfParams, WatermarkType,
};
pub use request::{EncodedRequest, RequestBuilder};
pub use response::{ApiResponse, RawResponse};

// Re-export commonly used types from dependencies
pub use http::{Method, StatusCode};
