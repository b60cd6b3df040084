use http::HeaderValue;

use crate::config::PdfGateConfig;
use crate::endpoint::{EndpointResolver, Environment, Operation};
use crate::error::Result;
use crate::params::{ApiOperation, ResponseShape};
use crate::request::{EncodedRequest, bearer_header};

/// Output of the encoder: the request plus what is needed to decode its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EncodedCall {
    pub(crate) operation: Operation,
    pub(crate) shape: ResponseShape,
    pub(crate) request: EncodedRequest,
}

/// Turns operation parameters into authenticated, timed requests.
#[derive(Debug, Clone)]
pub(crate) struct RequestEncoder {
    authorization: HeaderValue,
    resolver: EndpointResolver,
    config: PdfGateConfig,
}

impl RequestEncoder {
    pub(crate) fn new(api_key: &str, config: PdfGateConfig) -> Result<Self> {
        config.validate()?;
        let resolver = EndpointResolver::new(api_key, &config)?;
        let authorization = bearer_header(api_key)?;
        Ok(Self {
            authorization,
            resolver,
            config,
        })
    }

    pub(crate) const fn config(&self) -> &PdfGateConfig {
        &self.config
    }

    pub(crate) const fn environment(&self) -> Environment {
        self.resolver.environment()
    }

    pub(crate) fn base_url(&self) -> &str {
        self.resolver.base_url()
    }

    /// Validate and encode one operation. Fails before any I/O.
    pub(crate) fn encode<P: ApiOperation>(&self, params: P) -> Result<EncodedCall> {
        let operation = params.operation();
        let shape = params.response_shape();
        let payload = params.encode()?;
        let url = self
            .resolver
            .url(operation, payload.resource.as_deref(), &payload.query)?;

        let request = EncodedRequest::builder()
            .method(operation.method())
            .url(url)
            .authorization(self.authorization.clone())
            .body(payload.body)
            .timeout(self.config.timeout_for(operation))
            .build()?;

        Ok(EncodedCall {
            operation,
            shape,
            request,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use http::{Method, header};

    use super::*;
    use crate::body::{FormPart, RequestBody};
    use crate::params::{
        DocumentSource, ExtractPdfFormDataParams, FileParam, FlattenPdfParams, GeneratePdfParams,
        GetDocumentParams, GetFileParams, WatermarkPdfParams,
    };

    fn encoder() -> RequestEncoder {
        RequestEncoder::new(
            "test_key",
            PdfGateConfig::default().with_domain("http://localhost:9000/"),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_key_fails_at_construction() {
        let err = RequestEncoder::new("key", PdfGateConfig::default()).unwrap_err();
        assert!(err.is_invalid_usage());
    }

    #[test]
    fn test_invalid_config_fails_at_construction() {
        let config = PdfGateConfig {
            compress_pdf_timeout_secs: 0,
            ..PdfGateConfig::default()
        };
        assert!(RequestEncoder::new("live_key", config).unwrap_err().is_invalid_usage());
    }

    #[test]
    fn test_generate_request() {
        let call = encoder()
            .encode(GeneratePdfParams::from_html("<p>hi</p>"))
            .unwrap();
        let request = &call.request;

        assert_eq!(call.operation, Operation::GeneratePdf);
        assert_eq!(call.shape, ResponseShape::Binary);
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.url().as_str(), "http://localhost:9000/v1/generate/pdf");
        assert_eq!(request.headers()[header::AUTHORIZATION], "Bearer test_key");
        assert_eq!(request.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(request.timeout(), Duration::from_secs(15 * 60));
    }

    #[test]
    fn test_per_operation_timeouts() {
        let encoder = encoder();
        let flatten = encoder
            .encode(FlattenPdfParams::new(DocumentSource::document("d")))
            .unwrap();
        assert_eq!(flatten.request.timeout(), Duration::from_secs(180));

        let watermark = encoder
            .encode(WatermarkPdfParams::text(DocumentSource::document("d"), "DRAFT"))
            .unwrap();
        assert_eq!(watermark.request.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_extract_always_json_object() {
        let call = encoder()
            .encode(ExtractPdfFormDataParams::new(DocumentSource::document("d")))
            .unwrap();
        assert_eq!(call.shape, ResponseShape::JsonObject);
        assert_eq!(call.request.url().path(), "/forms/extract-data");
    }

    #[test]
    fn test_get_requests_have_no_body() {
        let encoder = encoder();
        let document = encoder
            .encode(GetDocumentParams::new("doc-1").with_pre_signed_url_expires_in(30))
            .unwrap();
        assert_eq!(document.request.method(), &Method::GET);
        assert_eq!(
            document.request.url().as_str(),
            "http://localhost:9000/document/doc-1?preSignedUrlExpiresIn=30"
        );
        assert!(document.request.body().is_empty());
        assert_eq!(document.shape, ResponseShape::Document);

        let file = encoder.encode(GetFileParams::new("doc-1")).unwrap();
        assert_eq!(file.request.url().as_str(), "http://localhost:9000/file/doc-1");
        assert_eq!(file.shape, ResponseShape::Binary);
    }

    #[test]
    fn test_response_shapes_differ_only_in_json_response_field() {
        let file = FileParam::new("in.pdf", &b"%PDF-1.7"[..]);
        let encoder = encoder();
        let binary = encoder
            .encode(FlattenPdfParams::new(file.clone()).with_response(ResponseShape::Binary))
            .unwrap();
        let json = encoder
            .encode(FlattenPdfParams::new(file).with_response(ResponseShape::Document))
            .unwrap();

        assert_ne!(binary.shape, json.shape);
        assert_eq!(binary.request.url(), json.request.url());
        assert_eq!(binary.request.headers(), json.request.headers());

        let (RequestBody::Multipart(binary_form), RequestBody::Multipart(json_form)) =
            (binary.request.body(), json.request.body())
        else {
            panic!("expected multipart bodies");
        };
        let without_flag = |form: &crate::body::MultipartForm| -> Vec<FormPart> {
            form.parts()
                .iter()
                .filter(|part| part.name() != "jsonResponse")
                .cloned()
                .collect()
        };
        assert_eq!(without_flag(binary_form), without_flag(json_form));
        assert_eq!(binary_form.text_value("jsonResponse"), Some("false"));
        assert_eq!(json_form.text_value("jsonResponse"), Some("true"));
    }

    #[test]
    fn test_validation_failure_builds_nothing() {
        let err = encoder()
            .encode(FlattenPdfParams::new(FileParam::new("", &b"x"[..])))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid usage: file name must be provided.");
    }
}
