use std::time::Duration;

use reqwest::multipart::{Form, Part};

use crate::body::{FormPart, MultipartForm, RequestBody};
use crate::error::{ClientError, PdfGateError};
use crate::request::EncodedRequest;
use crate::response::RawResponse;

const USER_AGENT: &str = concat!("pdfgate-rust/", env!("CARGO_PKG_VERSION"));

/// Connection-pooling HTTP transport shared by every call of one client.
///
/// Per-call timeouts are applied to each request; the shared client is never
/// reconfigured.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
}

impl Transport {
    pub(crate) fn new(connect_timeout: Duration) -> Result<Self, ClientError> {
        Self::with_user_agent(connect_timeout, USER_AGENT)
    }

    fn with_user_agent(connect_timeout: Duration, user_agent: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ClientError::invalid(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Send one request and buffer the full response body.
    pub(crate) async fn send(&self, request: &EncodedRequest) -> Result<RawResponse, PdfGateError> {
        let mut builder = self
            .http
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone())
            .timeout(request.timeout());

        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder.body(bytes.clone()),
            RequestBody::Multipart(form) => builder.multipart(to_reqwest_form(form)?),
        };

        let response = builder.send().await.map_err(PdfGateError::transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(PdfGateError::transport)?;

        Ok(RawResponse::new(status, headers, body))
    }
}

/// Materialize the stored parts into a reqwest form with a fresh boundary.
fn to_reqwest_form(form: &MultipartForm) -> Result<Form, PdfGateError> {
    form.parts()
        .iter()
        .try_fold(Form::new(), |reqwest_form, part| match part {
            FormPart::Text { name, value } => Ok(reqwest_form.text(name.clone(), value.clone())),
            FormPart::File {
                name,
                file_name,
                content_type,
                data,
            } => {
                let file = Part::bytes(data.to_vec())
                    .file_name(file_name.clone())
                    .mime_str(content_type)
                    .map_err(PdfGateError::transport)?;
                Ok(reqwest_form.part(name.clone(), file))
            }
        })
}
