use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::{
    ApiOperation, DocumentSource, EncodedPayload, FileParam, ResponseShape, append_output_fields,
    sealed,
};
use crate::body::MultipartForm;
use crate::endpoint::Operation;
use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkType {
    Text,
    Image,
}

impl fmt::Display for WatermarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Image => f.write_str("image"),
        }
    }
}

/// Parameters for stamping a text or image watermark on every page.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkPdfParams {
    pub source: DocumentSource,
    pub kind: WatermarkType,
    pub response: ResponseShape,
    /// Required for [`WatermarkType::Text`]
    pub text: Option<String>,
    /// Required for [`WatermarkType::Image`]; sent as the `watermark` part
    pub watermark: Option<FileParam>,
    pub font: Option<String>,
    pub font_size: Option<u32>,
    /// Hex color, e.g. `"#ff0000"`
    pub font_color: Option<String>,
    /// 0.0 (transparent) to 1.0 (opaque)
    pub opacity: Option<f64>,
    pub x_position: Option<i32>,
    pub y_position: Option<i32>,
    pub image_width: Option<u32>,
    pub image_height: Option<u32>,
    /// Rotation in degrees
    pub rotate: Option<f64>,
    pub pre_signed_url_expires_in: Option<u64>,
    pub metadata: Option<Value>,
}

impl WatermarkPdfParams {
    fn new(source: DocumentSource, kind: WatermarkType) -> Self {
        Self {
            source,
            kind,
            response: ResponseShape::default(),
            text: None,
            watermark: None,
            font: None,
            font_size: None,
            font_color: None,
            opacity: None,
            x_position: None,
            y_position: None,
            image_width: None,
            image_height: None,
            rotate: None,
            pre_signed_url_expires_in: None,
            metadata: None,
        }
    }

    /// Text watermark
    #[must_use]
    pub fn text(source: impl Into<DocumentSource>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(source.into(), WatermarkType::Text)
        }
    }

    /// Image watermark
    #[must_use]
    pub fn image(source: impl Into<DocumentSource>, watermark: FileParam) -> Self {
        Self {
            watermark: Some(watermark),
            ..Self::new(source.into(), WatermarkType::Image)
        }
    }

    /// Set the expected response shape
    #[must_use]
    pub fn with_response(mut self, response: ResponseShape) -> Self {
        self.response = response;
        self
    }

    fn validate(&self) -> Result<()> {
        self.source.validate()?;
        match self.kind {
            WatermarkType::Text => {
                if self.text.as_deref().is_none_or(|text| text.trim().is_empty()) {
                    return Err(ClientError::invalid("text must be provided when type is text."));
                }
            }
            WatermarkType::Image => {
                let watermark = self.watermark.as_ref().ok_or_else(|| {
                    ClientError::invalid("watermark file must be provided when type is image.")
                })?;
                watermark.validate("watermark file")?;
            }
        }
        Ok(())
    }
}

impl sealed::Sealed for WatermarkPdfParams {}

impl ApiOperation for WatermarkPdfParams {
    fn operation(&self) -> Operation {
        Operation::WatermarkPdf
    }

    fn response_shape(&self) -> ResponseShape {
        self.response
    }

    fn encode(self) -> Result<EncodedPayload> {
        self.validate()?;
        let form = MultipartForm::new()
            .text("type", self.kind.to_string())
            .text_opt("text", self.text)
            .text_opt("font", self.font)
            .text_opt("fontSize", self.font_size)
            .text_opt("fontColor", self.font_color)
            .text_opt("opacity", self.opacity)
            .text_opt("xPosition", self.x_position)
            .text_opt("yPosition", self.y_position)
            .text_opt("imageWidth", self.image_width)
            .text_opt("imageHeight", self.image_height)
            .text_opt("rotate", self.rotate);
        let form = append_output_fields(
            form,
            self.response,
            self.pre_signed_url_expires_in,
            self.metadata.as_ref(),
        )?;
        let mut form = self.source.append_to(form)?;
        if let (WatermarkType::Image, Some(watermark)) = (self.kind, &self.watermark) {
            form = watermark.append_to(form, "watermark")?;
        }
        Ok(EncodedPayload::from_body(form))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{FormPart, RequestBody};

    fn form(payload: EncodedPayload) -> MultipartForm {
        let RequestBody::Multipart(form) = payload.body else {
            panic!("expected multipart body");
        };
        form
    }

    #[test]
    fn test_text_watermark_fields() {
        let params = WatermarkPdfParams {
            font_size: Some(24),
            opacity: Some(0.25),
            rotate: Some(45.0),
            x_position: Some(-10),
            ..WatermarkPdfParams::text(DocumentSource::document("doc-3"), "CONFIDENTIAL")
        };

        let form = form(params.encode().unwrap());
        assert_eq!(form.text_value("type"), Some("text"));
        assert_eq!(form.text_value("text"), Some("CONFIDENTIAL"));
        assert_eq!(form.text_value("fontSize"), Some("24"));
        assert_eq!(form.text_value("opacity"), Some("0.25"));
        assert_eq!(form.text_value("rotate"), Some("45"));
        assert_eq!(form.text_value("xPosition"), Some("-10"));
        assert_eq!(form.text_value("documentId"), Some("doc-3"));
        assert!(form.get("watermark").is_none());
    }

    #[test]
    fn test_text_required_for_text_watermark() {
        let err = WatermarkPdfParams::text(DocumentSource::document("doc-3"), " ")
            .encode()
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid usage: text must be provided when type is text.");
    }

    #[test]
    fn test_image_watermark_adds_part_after_file() {
        let params = WatermarkPdfParams::image(
            FileParam::new("in.pdf", &b"%PDF"[..]),
            FileParam::new("stamp.png", &b"\x89PNG"[..]),
        );

        let form = form(params.encode().unwrap());
        let names: Vec<&str> = form.parts().iter().map(FormPart::name).collect();
        assert_eq!(names, ["type", "jsonResponse", "file", "watermark"]);
        let Some(FormPart::File { content_type, .. }) = form.get("watermark") else {
            panic!("watermark part missing");
        };
        assert_eq!(content_type, "image/png");
    }

    #[test]
    fn test_image_watermark_requires_file() {
        let mut params = WatermarkPdfParams::image(
            DocumentSource::document("doc-1"),
            FileParam::new("stamp.png", &b"x"[..]),
        );
        params.watermark = None;
        assert_eq!(
            params.clone().encode().unwrap_err().to_string(),
            "Invalid usage: watermark file must be provided when type is image."
        );

        params.watermark = Some(FileParam::new("stamp.png", bytes::Bytes::new()));
        assert_eq!(
            params.encode().unwrap_err().to_string(),
            "Invalid usage: watermark file data must be provided."
        );
    }
}
