//! Endpoint resolution
//!
//! The API key prefix picks the environment (`live_` for production, `test_`
//! for sandbox); the environment picks the configured domain. Operation URLs
//! are composed as `{base}/{version?}/{path}[/{id}]`.

use std::fmt;

use http::Method;
use url::Url;

use crate::config::PdfGateConfig;
use crate::error::{ClientError, Result};

const API_VERSION: &str = "v1";
const LIVE_KEY_PREFIX: &str = "live_";
const TEST_KEY_PREFIX: &str = "test_";

/// Service environment selected by the API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Production,
    Sandbox,
}

impl Environment {
    /// Derive the environment from an API key prefix.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] for a blank key or an unknown prefix.
    pub fn from_api_key(api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(ClientError::invalid("API key must be provided."));
        }
        if api_key.starts_with(LIVE_KEY_PREFIX) {
            Ok(Self::Production)
        } else if api_key.starts_with(TEST_KEY_PREFIX) {
            Ok(Self::Sandbox)
        } else {
            Err(ClientError::invalid(
                "Invalid API key format. Expected to start with 'live_' or 'test_'.",
            ))
        }
    }

    /// Configured domain for this environment
    #[must_use]
    pub fn domain(self, config: &PdfGateConfig) -> &str {
        match self {
            Self::Production => &config.production_api_domain,
            Self::Sandbox => &config.sandbox_api_domain,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Sandbox => f.write_str("sandbox"),
        }
    }
}

/// Remote capability exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GeneratePdf,
    FlattenPdf,
    ProtectPdf,
    CompressPdf,
    WatermarkPdf,
    ExtractPdfFormData,
    GetDocument,
    GetFile,
}

impl Operation {
    /// Stable name used in logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GeneratePdf => "generate_pdf",
            Self::FlattenPdf => "flatten_pdf",
            Self::ProtectPdf => "protect_pdf",
            Self::CompressPdf => "compress_pdf",
            Self::WatermarkPdf => "watermark_pdf",
            Self::ExtractPdfFormData => "extract_pdf_form_data",
            Self::GetDocument => "get_document",
            Self::GetFile => "get_file",
        }
    }

    /// HTTP method of the operation
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::GetDocument | Self::GetFile => Method::GET,
            Self::GeneratePdf
            | Self::FlattenPdf
            | Self::ProtectPdf
            | Self::CompressPdf
            | Self::WatermarkPdf
            | Self::ExtractPdfFormData => Method::POST,
        }
    }

    /// API version prefix; only PDF generation is versioned.
    #[must_use]
    pub const fn version(self) -> Option<&'static str> {
        match self {
            Self::GeneratePdf => Some(API_VERSION),
            _ => None,
        }
    }

    /// Path below the version prefix
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::GeneratePdf => "generate/pdf",
            Self::FlattenPdf => "forms/flatten",
            Self::ProtectPdf => "protect/pdf",
            Self::CompressPdf => "compress/pdf",
            Self::WatermarkPdf => "watermark/pdf",
            Self::ExtractPdfFormData => "forms/extract-data",
            Self::GetDocument => "document",
            Self::GetFile => "file",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves operation URLs against the base URL chosen for an API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResolver {
    environment: Environment,
    base: Url,
}

impl EndpointResolver {
    /// Resolve the base URL for an API key.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] for an invalid key, or a domain
    /// that is blank or not an absolute URL.
    pub fn new(api_key: &str, config: &PdfGateConfig) -> Result<Self> {
        let environment = Environment::from_api_key(api_key)?;
        let domain = environment.domain(config).trim();
        if domain.is_empty() {
            return Err(ClientError::invalid("domain must be provided."));
        }
        let domain = domain.trim_end_matches('/');
        let base = Url::parse(domain)
            .map_err(|e| ClientError::invalid(format!("Invalid API domain '{domain}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::invalid(format!(
                "Invalid API domain '{domain}': not a base URL"
            )));
        }

        Ok(Self { environment, base })
    }

    /// Environment selected by the API key
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Compose the URL of one operation.
    ///
    /// `resource` is appended as an escaped path segment; query pairs are
    /// appended only when present.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] if the base URL cannot carry a path.
    pub fn url(
        &self,
        operation: Operation,
        resource: Option<&str>,
        query: &[(String, String)],
    ) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ClientError::invalid("API domain cannot carry a path"))?;
            segments.pop_if_empty();
            if let Some(version) = operation.version() {
                segments.push(version);
            }
            segments.extend(operation.path().split('/'));
            if let Some(resource) = resource {
                segments.push(resource);
            }
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}
