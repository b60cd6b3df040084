use std::time::Duration;

use http::{HeaderMap, HeaderValue, Method};
use url::Url;

use crate::body::RequestBody;
use crate::error::ClientError;

/// Fully encoded HTTP request of one call.
///
/// Plain data: nothing is sent until the owning call executes, and a cloned
/// call carries an identical copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: RequestBody,
    timeout: Duration,
}

impl EncodedRequest {
    /// Create a new request builder
    #[must_use]
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// Get the HTTP method
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Get the request URL
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Get the request headers
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the request body
    #[must_use]
    pub const fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Total time allowed for the exchange
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Builder for constructing encoded requests with a fluent API
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    url: Option<Url>,
    headers: HeaderMap,
    body: RequestBody,
    timeout: Option<Duration>,
}

impl RequestBuilder {
    /// Set the HTTP method
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Set the request URL
    #[must_use]
    pub fn url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    /// Set the `Authorization` header to an already encoded bearer value
    #[must_use]
    pub fn authorization(mut self, value: HeaderValue) -> Self {
        self.headers.insert(http::header::AUTHORIZATION, value);
        self
    }

    /// Set the request body; JSON bodies also set `Content-Type`.
    ///
    /// Multipart bodies get their boundary-carrying `Content-Type` when the
    /// transport materializes the form.
    #[must_use]
    pub fn body<B: Into<RequestBody>>(mut self, body: B) -> Self {
        self.body = body.into();
        if matches!(self.body, RequestBody::Json(_)) {
            self.headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }
        self
    }

    /// Set request timeout
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Build the request
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidUsage`] if no URL or timeout was set.
    pub fn build(self) -> Result<EncodedRequest, ClientError> {
        let method = self.method.unwrap_or(Method::GET);
        let url = self
            .url
            .ok_or_else(|| ClientError::invalid("Request URL is required"))?;
        let timeout = self
            .timeout
            .ok_or_else(|| ClientError::invalid("Request timeout is required"))?;

        Ok(EncodedRequest {
            method,
            url,
            headers: self.headers,
            body: self.body,
            timeout,
        })
    }
}

/// Encode a bearer token as a sensitive header value.
pub(crate) fn bearer_header(token: &str) -> Result<HeaderValue, ClientError> {
    let mut value = HeaderValue::try_from(format!("Bearer {token}"))
        .map_err(|_| ClientError::invalid("API key contains characters not allowed in a header"))?;
    value.set_sensitive(true);
    Ok(value)
}
