use bytes::Bytes;
use serde_json::{Map, Value};

use crate::call::PendingCall;
use crate::config::PdfGateConfig;
use crate::document::PdfGateDocument;
use crate::encoder::RequestEncoder;
use crate::endpoint::Environment;
use crate::error::{ClientError, PdfGateError, Result};
use crate::params::{
    ApiOperation, CompressPdfParams, ExtractPdfFormDataParams, FlattenPdfParams,
    GeneratePdfParams, GetDocumentParams, GetFileParams, ProtectPdfParams, ResponseShape,
    WatermarkPdfParams,
};
use crate::response::ApiResponse;
use crate::runtime::WorkerPool;
use crate::transport::Transport;

/// Client for the PDFGate API.
///
/// Cheap to clone; clones share the connection pool and worker runtime.
#[derive(Debug, Clone)]
pub struct PdfGateClient {
    encoder: RequestEncoder,
    transport: Transport,
    workers: WorkerPool,
}

impl PdfGateClient {
    /// Create a client with default configuration.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] if the API key does not start with
    /// `live_` or `test_`.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_config(api_key, PdfGateConfig::default())
    }

    /// Create a client with explicit configuration.
    ///
    /// The key prefix selects the production or sandbox domain of `config`.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] for an invalid key or
    /// configuration.
    pub fn with_config(api_key: &str, config: PdfGateConfig) -> Result<Self> {
        let encoder = RequestEncoder::new(api_key, config)?;
        let transport = Transport::new(encoder.config().default_timeout())?;
        let workers = WorkerPool::current_or_owned()?;

        tracing::info!(
            environment = %encoder.environment(),
            base_url = %encoder.base_url(),
            owned_runtime = workers.is_owned(),
            "PdfGate client created"
        );

        Ok(Self {
            encoder,
            transport,
            workers,
        })
    }

    /// Create a client from environment variables
    ///
    /// Expects:
    /// - `PDFGATE_API_KEY`: API key (required)
    /// - the optional overrides read by [`PdfGateConfig::from_env`]
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] if the key is missing or any value
    /// is invalid.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("PDFGATE_API_KEY")
            .map_err(|_| ClientError::invalid("PDFGATE_API_KEY not set"))?;
        Self::with_config(&api_key, PdfGateConfig::from_env()?)
    }

    #[must_use]
    pub const fn config(&self) -> &PdfGateConfig {
        self.encoder.config()
    }

    /// Environment selected by the API key
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.encoder.environment()
    }

    /// Base URL all operation paths are resolved against
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.encoder.base_url()
    }

    /// Validate and encode parameters into an unexecuted call.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] if the parameters are incomplete
    /// or malformed. Nothing is sent.
    pub fn prepare<P: ApiOperation>(&self, params: P) -> Result<PendingCall> {
        let encoded = self.encoder.encode(params)?;
        Ok(PendingCall::new(
            encoded.operation,
            encoded.request,
            encoded.shape,
            self.transport.clone(),
            self.workers.clone(),
        ))
    }

    /// Prepare and execute a call
    ///
    /// # Errors
    /// See [`PendingCall::execute`].
    pub async fn execute<P: ApiOperation>(&self, params: P) -> Result<ApiResponse> {
        self.prepare(params)?.execute().await
    }

    /// Prepare and execute a call, blocking the current thread
    ///
    /// # Errors
    /// See [`PendingCall::execute_blocking`].
    pub fn execute_blocking<P: ApiOperation>(&self, params: P) -> Result<ApiResponse> {
        self.prepare(params)?.execute_blocking()
    }

    /// Render a PDF from HTML or a URL
    ///
    /// # Errors
    /// See [`PendingCall::execute`].
    pub async fn generate_pdf(&self, params: GeneratePdfParams) -> Result<ApiResponse> {
        self.execute(params).await
    }

    /// Blocking version of [`generate_pdf`](Self::generate_pdf)
    ///
    /// # Errors
    /// See [`PendingCall::execute_blocking`].
    pub fn generate_pdf_blocking(&self, params: GeneratePdfParams) -> Result<ApiResponse> {
        self.execute_blocking(params)
    }

    /// Flatten form fields and annotations
    ///
    /// # Errors
    /// See [`PendingCall::execute`].
    pub async fn flatten_pdf(&self, params: FlattenPdfParams) -> Result<ApiResponse> {
        self.execute(params).await
    }

    /// Blocking version of [`flatten_pdf`](Self::flatten_pdf)
    ///
    /// # Errors
    /// See [`PendingCall::execute_blocking`].
    pub fn flatten_pdf_blocking(&self, params: FlattenPdfParams) -> Result<ApiResponse> {
        self.execute_blocking(params)
    }

    /// Encrypt a PDF
    ///
    /// # Errors
    /// See [`PendingCall::execute`].
    pub async fn protect_pdf(&self, params: ProtectPdfParams) -> Result<ApiResponse> {
        self.execute(params).await
    }

    /// Blocking version of [`protect_pdf`](Self::protect_pdf)
    ///
    /// # Errors
    /// See [`PendingCall::execute_blocking`].
    pub fn protect_pdf_blocking(&self, params: ProtectPdfParams) -> Result<ApiResponse> {
        self.execute_blocking(params)
    }

    /// Compress a PDF
    ///
    /// # Errors
    /// See [`PendingCall::execute`].
    pub async fn compress_pdf(&self, params: CompressPdfParams) -> Result<ApiResponse> {
        self.execute(params).await
    }

    /// Blocking version of [`compress_pdf`](Self::compress_pdf)
    ///
    /// # Errors
    /// See [`PendingCall::execute_blocking`].
    pub fn compress_pdf_blocking(&self, params: CompressPdfParams) -> Result<ApiResponse> {
        self.execute_blocking(params)
    }

    /// Watermark a PDF
    ///
    /// # Errors
    /// See [`PendingCall::execute`].
    pub async fn watermark_pdf(&self, params: WatermarkPdfParams) -> Result<ApiResponse> {
        self.execute(params).await
    }

    /// Blocking version of [`watermark_pdf`](Self::watermark_pdf)
    ///
    /// # Errors
    /// See [`PendingCall::execute_blocking`].
    pub fn watermark_pdf_blocking(&self, params: WatermarkPdfParams) -> Result<ApiResponse> {
        self.execute_blocking(params)
    }

    /// Read form field values
    ///
    /// # Errors
    /// See [`PendingCall::execute`].
    pub async fn extract_pdf_form_data(
        &self,
        params: ExtractPdfFormDataParams,
    ) -> Result<Map<String, Value>> {
        expect_object(self.execute(params).await?)
    }

    /// Blocking version of [`extract_pdf_form_data`](Self::extract_pdf_form_data)
    ///
    /// # Errors
    /// See [`PendingCall::execute_blocking`].
    pub fn extract_pdf_form_data_blocking(
        &self,
        params: ExtractPdfFormDataParams,
    ) -> Result<Map<String, Value>> {
        expect_object(self.execute_blocking(params)?)
    }

    /// Fetch the record of a stored document
    ///
    /// # Errors
    /// See [`PendingCall::execute`].
    pub async fn get_document(&self, params: GetDocumentParams) -> Result<PdfGateDocument> {
        expect_document(self.execute(params).await?)
    }

    /// Blocking version of [`get_document`](Self::get_document)
    ///
    /// # Errors
    /// See [`PendingCall::execute_blocking`].
    pub fn get_document_blocking(&self, params: GetDocumentParams) -> Result<PdfGateDocument> {
        expect_document(self.execute_blocking(params)?)
    }

    /// Download the bytes of a stored document
    ///
    /// # Errors
    /// See [`PendingCall::execute`].
    pub async fn get_file(&self, params: GetFileParams) -> Result<Bytes> {
        expect_bytes(self.execute(params).await?)
    }

    /// Blocking version of [`get_file`](Self::get_file)
    ///
    /// # Errors
    /// See [`PendingCall::execute_blocking`].
    pub fn get_file_blocking(&self, params: GetFileParams) -> Result<Bytes> {
        expect_bytes(self.execute_blocking(params)?)
    }
}

fn unexpected_shape(expected: ResponseShape, response: &ApiResponse) -> ClientError {
    let actual = response.shape();
    PdfGateError::decode(format!("expected a {expected} response, decoded {actual}")).into()
}

fn expect_object(response: ApiResponse) -> Result<Map<String, Value>> {
    match response {
        ApiResponse::Object(object) => Ok(object),
        other => Err(unexpected_shape(ResponseShape::JsonObject, &other)),
    }
}

fn expect_document(response: ApiResponse) -> Result<PdfGateDocument> {
    match response {
        ApiResponse::Document(document) => Ok(document),
        other => Err(unexpected_shape(ResponseShape::Document, &other)),
    }
}

fn expect_bytes(response: ApiResponse) -> Result<Bytes> {
    match response {
        ApiResponse::File(bytes) => Ok(bytes),
        other => Err(unexpected_shape(ResponseShape::Binary, &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_selects_environment() {
        let client = PdfGateClient::new("live_abc").unwrap();
        assert_eq!(client.environment(), Environment::Production);
        assert_eq!(client.base_url(), "https://api.pdfgate.com");

        let client = PdfGateClient::new("test_abc").unwrap();
        assert_eq!(client.environment(), Environment::Sandbox);
        assert_eq!(client.base_url(), "https://api-sandbox.pdfgate.com");
    }

    #[test]
    fn test_client_creation_rejects_bad_key() {
        let err = PdfGateClient::new("sk_abc").unwrap_err();
        assert!(err.is_invalid_usage());
    }

    #[test]
    fn test_prepare_does_not_execute() {
        let client = PdfGateClient::new("test_abc").unwrap();
        let call = client.prepare(GetFileParams::new("doc-1")).unwrap();
        assert!(!call.is_executed());
        assert_eq!(call.response_shape(), ResponseShape::Binary);
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_client_creation_logs_environment_without_key() {
        let client = PdfGateClient::new("live_secret_0123").unwrap();
        drop(client);

        assert!(logs_contain("PdfGate client created"));
        assert!(logs_contain("environment=production"));
        assert!(!logs_contain("live_secret_0123"));
    }

    #[test]
    fn test_unexpected_shape_is_decode_error() {
        let err = expect_document(ApiResponse::File(Bytes::new())).unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("expected a document response"));
    }
}
