use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::{ApiOperation, EncodedPayload, ResponseShape, sealed};
use crate::body::RequestBody;
use crate::endpoint::Operation;
use crate::error::{ClientError, Result};

/// Paper format of generated pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSizeType {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    Ledger,
    Tabloid,
    Legal,
    Letter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOrientation {
    Portrait,
    Landscape,
}

/// CSS media type emulated while rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmulateMediaType {
    Screen,
    Print,
}

/// Page margins as CSS lengths (`"10px"`, `"1cm"`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PdfPageMargin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
}

/// Selectors clicked in order before rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClickSelectorChain {
    pub selectors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickSelectorChainSetup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_failing_chains: Option<bool>,
    pub chains: Vec<ClickSelectorChain>,
}

/// HTTP basic credentials used when fetching the source URL
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct GeneratePdfAuthentication {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for GeneratePdfAuthentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratePdfAuthentication")
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Parameters for rendering a PDF from HTML or a URL.
///
/// Serialized as the camelCase JSON body of `POST /v1/generate/pdf`; unset
/// options are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePdfParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip)]
    pub response: ResponseShape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_signed_url_expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size_type: Option<PageSizeType>,
    /// Page width in pixels; overrides `page_size_type`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<FileOrientation>,
    /// HTML template of the page header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<PdfPageMargin>,
    /// Rendering timeout on the service side, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javascript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emulate_media_type: Option<EmulateMediaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_headers: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_selector_chain_setup: Option<ClickSelectorChainSetup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_network_idle: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_form_fields: Option<bool>,
    /// Extra wait before rendering, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_images: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Pages to keep, e.g. `"1-5"` or `"1,3,5"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_ranges: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_background: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<GeneratePdfAuthentication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

/// Request body: the parameters plus the wire form of the response shape.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBody<'a> {
    #[serde(flatten)]
    params: &'a GeneratePdfParams,
    json_response: bool,
}

impl GeneratePdfParams {
    /// Render inline HTML
    #[must_use]
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Self::default()
        }
    }

    /// Render the page at a URL
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Set the expected response shape
    #[must_use]
    pub const fn with_response(mut self, response: ResponseShape) -> Self {
        self.response = response;
        self
    }

    fn validate(&self) -> Result<()> {
        let present = |value: Option<&str>| value.is_some_and(|v| !v.trim().is_empty());
        if !present(self.html.as_deref()) && !present(self.url.as_deref()) {
            return Err(ClientError::invalid(
                "Either the 'html' or 'url' parameters must be provided to generate a PDF.",
            ));
        }
        Ok(())
    }
}

impl sealed::Sealed for GeneratePdfParams {}

impl ApiOperation for GeneratePdfParams {
    fn operation(&self) -> Operation {
        Operation::GeneratePdf
    }

    fn response_shape(&self) -> ResponseShape {
        self.response
    }

    fn encode(self) -> Result<EncodedPayload> {
        self.validate()?;
        let body = RequestBody::json(&GenerateBody {
            params: &self,
            json_response: self.response.is_json(),
        })?;
        Ok(EncodedPayload::from_body(body))
    }
}
