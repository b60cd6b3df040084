//! Stored document description returned by the service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifecycle state of a stored document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Processing,
    Completed,
    Expired,
    Failed,
    /// A status this client version does not know
    #[serde(other)]
    Unknown,
}

/// How a stored document was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    FromHtml,
    Flattened,
    Watermarked,
    Encrypted,
    Compressed,
    Signed,
    #[serde(other)]
    Unknown,
}

/// Document record as returned by JSON-shaped responses.
///
/// All fields are optional on the wire; absent fields decode to `None` (or an
/// empty `id`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfGateDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    #[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Temporary download URL, if one was requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Id of the document this one was produced from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<String>,
}

/// ISO-8601 instants; `null` and blank strings mean "absent".
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(instant) => {
                serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|instant| Some(instant.with_timezone(&Utc)))
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{raw}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_decode_full_document() {
        let doc: PdfGateDocument = serde_json::from_value(json!({
            "id": "abc123",
            "status": "completed",
            "type": "from_html",
            "createdAt": "2024-01-01T00:00:00Z",
            "expiresAt": "2024-01-02T12:30:00.250+02:00",
            "fileUrl": "https://files.example.com/abc123.pdf",
            "size": 4096,
            "metadata": {"orderId": 7},
            "derivedFrom": "src-1"
        }))
        .unwrap();

        assert_eq!(doc.id, "abc123");
        assert_eq!(doc.status, Some(DocumentStatus::Completed));
        assert_eq!(doc.document_type, Some(DocumentType::FromHtml));
        assert_eq!(doc.created_at, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(
            doc.expires_at.unwrap().to_rfc3339(),
            "2024-01-02T10:30:00.250+00:00"
        );
        assert_eq!(doc.size, Some(4096));
        assert_eq!(doc.metadata.unwrap()["orderId"], 7);
        assert_eq!(doc.derived_from.as_deref(), Some("src-1"));
    }

    #[test]
    fn test_null_and_blank_timestamps_are_absent() {
        let doc: PdfGateDocument =
            serde_json::from_value(json!({"id": "x", "createdAt": null, "expiresAt": " "}))
                .unwrap();
        assert!(doc.created_at.is_none());
        assert!(doc.expires_at.is_none());
    }

    #[test]
    fn test_malformed_timestamp_rejected() {
        let result: Result<PdfGateDocument, _> =
            serde_json::from_value(json!({"createdAt": "yesterday"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_enum_values() {
        let doc: PdfGateDocument =
            serde_json::from_value(json!({"status": "archived", "type": "merged"})).unwrap();
        assert_eq!(doc.status, Some(DocumentStatus::Unknown));
        assert_eq!(doc.document_type, Some(DocumentType::Unknown));
    }

    #[test]
    fn test_reserialize_preserves_enum_and_date_values() {
        let source = json!({
            "id": "abc123",
            "status": "expired",
            "type": "watermarked",
            "createdAt": "2024-01-01T00:00:00Z",
            "expiresAt": "2024-03-05T08:09:10.500Z"
        });
        let doc: PdfGateDocument = serde_json::from_value(source.clone()).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), source);
    }
}
