//! Client configuration
//!
//! Domains and timeouts for the PDFGate service. Every field has a default,
//! so a config file only needs to name what it overrides.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::endpoint::Operation;
use crate::error::ClientError;

/// Configuration for [`PdfGateClient`](crate::PdfGateClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PdfGateConfig {
    /// Domain used for `live_` API keys
    #[serde(default = "default_production_api_domain")]
    pub production_api_domain: String,
    /// Domain used for `test_` API keys
    #[serde(default = "default_sandbox_api_domain")]
    pub sandbox_api_domain: String,
    /// Connect timeout, and call timeout for operations without an override
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,
    #[serde(default = "default_generate_pdf_timeout_secs")]
    pub generate_pdf_timeout_secs: u64,
    #[serde(default = "default_processing_timeout_secs")]
    pub flatten_pdf_timeout_secs: u64,
    #[serde(default = "default_processing_timeout_secs")]
    pub protect_pdf_timeout_secs: u64,
    #[serde(default = "default_processing_timeout_secs")]
    pub compress_pdf_timeout_secs: u64,
}

impl Default for PdfGateConfig {
    fn default() -> Self {
        Self {
            production_api_domain: default_production_api_domain(),
            sandbox_api_domain: default_sandbox_api_domain(),
            default_timeout_secs: default_timeout_secs(),
            generate_pdf_timeout_secs: default_generate_pdf_timeout_secs(),
            flatten_pdf_timeout_secs: default_processing_timeout_secs(),
            protect_pdf_timeout_secs: default_processing_timeout_secs(),
            compress_pdf_timeout_secs: default_processing_timeout_secs(),
        }
    }
}

fn default_production_api_domain() -> String {
    "https://api.pdfgate.com".to_owned()
}

fn default_sandbox_api_domain() -> String {
    "https://api-sandbox.pdfgate.com".to_owned()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_generate_pdf_timeout_secs() -> u64 {
    15 * 60
}

fn default_processing_timeout_secs() -> u64 {
    3 * 60
}

impl PdfGateConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables (all optional, defaults apply when unset):
    /// - `PDFGATE_PRODUCTION_DOMAIN`
    /// - `PDFGATE_SANDBOX_DOMAIN`
    /// - `PDFGATE_TIMEOUT_SECS`: default timeout in seconds
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] if a value is malformed.
    pub fn from_env() -> Result<Self, ClientError> {
        let mut config = Self::default();

        if let Ok(domain) = std::env::var("PDFGATE_PRODUCTION_DOMAIN") {
            config.production_api_domain = domain;
        }
        if let Ok(domain) = std::env::var("PDFGATE_SANDBOX_DOMAIN") {
            config.sandbox_api_domain = domain;
        }
        if let Ok(raw) = std::env::var("PDFGATE_TIMEOUT_SECS") {
            config.default_timeout_secs = raw.trim().parse().map_err(|e| {
                ClientError::invalid(format!("PDFGATE_TIMEOUT_SECS is not a number of seconds: {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that domains are set and every timeout is non-zero.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ClientError> {
        require_non_blank(&self.production_api_domain, "production_api_domain")?;
        require_non_blank(&self.sandbox_api_domain, "sandbox_api_domain")?;

        let timeouts = [
            (self.default_timeout_secs, "default_timeout_secs"),
            (self.generate_pdf_timeout_secs, "generate_pdf_timeout_secs"),
            (self.flatten_pdf_timeout_secs, "flatten_pdf_timeout_secs"),
            (self.protect_pdf_timeout_secs, "protect_pdf_timeout_secs"),
            (self.compress_pdf_timeout_secs, "compress_pdf_timeout_secs"),
        ];
        if let Some((_, label)) = timeouts.iter().find(|(secs, _)| *secs == 0) {
            return Err(ClientError::invalid(format!("{label} must be greater than zero.")));
        }
        Ok(())
    }

    /// Set the default timeout
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] if `timeout` is not a whole
    /// number of seconds.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Result<Self, ClientError> {
        self.default_timeout_secs = whole_seconds(timeout, "default_timeout_secs")?;
        Ok(self)
    }

    /// Set the generate-PDF timeout
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] if `timeout` is not a whole
    /// number of seconds.
    pub fn with_generate_pdf_timeout(mut self, timeout: Duration) -> Result<Self, ClientError> {
        self.generate_pdf_timeout_secs = whole_seconds(timeout, "generate_pdf_timeout_secs")?;
        Ok(self)
    }

    /// Point both environments at the same domain (useful for local mocks)
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        let domain = domain.into();
        self.sandbox_api_domain.clone_from(&domain);
        self.production_api_domain = domain;
        self
    }

    /// Default timeout
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    /// Timeout applied to one call of the given operation.
    #[must_use]
    pub const fn timeout_for(&self, operation: Operation) -> Duration {
        let secs = match operation {
            Operation::GeneratePdf => self.generate_pdf_timeout_secs,
            Operation::FlattenPdf => self.flatten_pdf_timeout_secs,
            Operation::ProtectPdf => self.protect_pdf_timeout_secs,
            Operation::CompressPdf => self.compress_pdf_timeout_secs,
            Operation::WatermarkPdf
            | Operation::ExtractPdfFormData
            | Operation::GetDocument
            | Operation::GetFile => self.default_timeout_secs,
        };
        Duration::from_secs(secs)
    }
}

fn whole_seconds(timeout: Duration, label: &str) -> Result<u64, ClientError> {
    if timeout.subsec_nanos() != 0 {
        return Err(ClientError::invalid(format!(
            "{label} must be a whole number of seconds, got {}ms.",
            timeout.as_millis()
        )));
    }
    Ok(timeout.as_secs())
}

fn require_non_blank(value: &str, label: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::invalid(format!("{label} must be provided.")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PdfGateConfig::default();
        assert_eq!(config.production_api_domain, "https://api.pdfgate.com");
        assert_eq!(config.sandbox_api_domain, "https://api-sandbox.pdfgate.com");
        assert_eq!(config.default_timeout(), Duration::from_secs(60));
        assert_eq!(config.timeout_for(Operation::GeneratePdf), Duration::from_secs(900));
        assert_eq!(config.timeout_for(Operation::FlattenPdf), Duration::from_secs(180));
        assert_eq!(config.timeout_for(Operation::ProtectPdf), Duration::from_secs(180));
        assert_eq!(config.timeout_for(Operation::CompressPdf), Duration::from_secs(180));
        assert_eq!(config.timeout_for(Operation::WatermarkPdf), Duration::from_secs(60));
        assert_eq!(config.timeout_for(Operation::GetFile), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PdfGateConfig = serde_json::from_value(serde_json::json!({
            "sandbox_api_domain": "http://localhost:9000",
            "generate_pdf_timeout_secs": 30
        }))
        .unwrap();

        assert_eq!(config.sandbox_api_domain, "http://localhost:9000");
        assert_eq!(config.production_api_domain, "https://api.pdfgate.com");
        assert_eq!(config.timeout_for(Operation::GeneratePdf), Duration::from_secs(30));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<PdfGateConfig, _> =
            serde_json::from_value(serde_json::json!({"retries": 3}));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_blank_domain() {
        let config = PdfGateConfig {
            sandbox_api_domain: "   ".to_owned(),
            ..PdfGateConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.is_invalid_usage());
        assert!(err.to_string().contains("sandbox_api_domain"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = PdfGateConfig::default()
            .with_default_timeout(Duration::ZERO)
            .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_timeout_secs"));
    }

    #[test]
    fn test_sub_second_timeouts_rejected() {
        let err = PdfGateConfig::default()
            .with_default_timeout(Duration::from_millis(500))
            .unwrap_err();
        assert!(err.is_invalid_usage());
        assert_eq!(
            err.to_string(),
            "Invalid usage: default_timeout_secs must be a whole number of seconds, got 500ms."
        );

        let err = PdfGateConfig::default()
            .with_generate_pdf_timeout(Duration::from_millis(1500))
            .unwrap_err();
        assert!(err.to_string().contains("generate_pdf_timeout_secs"));

        let config = PdfGateConfig::default()
            .with_generate_pdf_timeout(Duration::from_secs(30))
            .unwrap();
        assert_eq!(config.timeout_for(Operation::GeneratePdf), Duration::from_secs(30));
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("PDFGATE_PRODUCTION_DOMAIN", Some("http://prod.local")),
                ("PDFGATE_SANDBOX_DOMAIN", None),
                ("PDFGATE_TIMEOUT_SECS", Some("5")),
            ],
            || {
                let config = PdfGateConfig::from_env().unwrap();
                assert_eq!(config.production_api_domain, "http://prod.local");
                assert_eq!(config.sandbox_api_domain, "https://api-sandbox.pdfgate.com");
                assert_eq!(config.default_timeout(), Duration::from_secs(5));
            },
        );
    }

    #[test]
    fn test_from_env_rejects_bad_timeout() {
        temp_env::with_var("PDFGATE_TIMEOUT_SECS", Some("soon"), || {
            let err = PdfGateConfig::from_env().unwrap_err();
            assert!(err.is_invalid_usage());
        });
    }
}
