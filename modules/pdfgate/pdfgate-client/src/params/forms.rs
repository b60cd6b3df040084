use super::{ApiOperation, DocumentSource, EncodedPayload, ResponseShape, sealed};
use crate::body::MultipartForm;
use crate::endpoint::Operation;
use crate::error::Result;

/// Parameters for reading the values of a PDF's form fields.
///
/// The service answers with a free-form JSON object keyed by field name, so
/// the response shape is always [`ResponseShape::JsonObject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractPdfFormDataParams {
    pub source: DocumentSource,
}

impl ExtractPdfFormDataParams {
    #[must_use]
    pub fn new(source: impl Into<DocumentSource>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl sealed::Sealed for ExtractPdfFormDataParams {}

impl ApiOperation for ExtractPdfFormDataParams {
    fn operation(&self) -> Operation {
        Operation::ExtractPdfFormData
    }

    fn response_shape(&self) -> ResponseShape {
        ResponseShape::JsonObject
    }

    fn encode(self) -> Result<EncodedPayload> {
        self.source.validate()?;
        let form = self.source.append_to(MultipartForm::new())?;
        Ok(EncodedPayload::from_body(form))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::RequestBody;
    use crate::params::FileParam;

    #[test]
    fn test_always_json_object_without_json_response_field() {
        let params = ExtractPdfFormDataParams::new(FileParam::new("form.pdf", &b"%PDF"[..]));
        assert_eq!(params.response_shape(), ResponseShape::JsonObject);

        let payload = params.encode().unwrap();
        let RequestBody::Multipart(form) = &payload.body else {
            panic!("expected multipart body");
        };
        assert_eq!(form.parts().len(), 1);
        assert!(form.get("file").is_some());
        assert!(form.get("jsonResponse").is_none());
    }
}
