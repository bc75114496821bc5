use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::size::format_size;

/// Category of structural damage detected in a PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CorruptionKind {
    InvalidHeader,
    BrokenXref,
    MissingTrailer,
    InvalidStructure,
    CorruptedObject,
    Other,
}

impl CorruptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorruptionKind::InvalidHeader => "invalid_header",
            CorruptionKind::BrokenXref => "broken_xref",
            CorruptionKind::MissingTrailer => "missing_trailer",
            CorruptionKind::InvalidStructure => "invalid_structure",
            CorruptionKind::CorruptedObject => "corrupted_object",
            CorruptionKind::Other => "other",
        }
    }
}

impl std::fmt::Display for CorruptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the malware screening stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScanResult {
    Clean,
    Infected,
    Unscanned,
    ScanUnavailable,
}

impl ScanResult {
    /// Records with an inconclusive scan belong in the quarantine partition.
    pub fn requires_quarantine(&self) -> bool {
        matches!(self, ScanResult::ScanUnavailable)
    }
}

/// Lifecycle of a document upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Accepted,
    InProgress,
    Completed,
    Failed,
    Cancelled,
    Interrupted,
}

/// An accepted PDF upload held by the document store.
#[derive(Debug, Clone)]
pub struct DocumentAsset {
    pub id: Uuid,
    pub original_name: String,
    pub declared_mime_type: String,
    pub size_bytes: usize,
    pub received_at: DateTime<Utc>,
    pub integrity_valid: bool,
    pub corruption_kind: Option<CorruptionKind>,
    pub scan_result: ScanResult,
    pub access_token: String,
    pub lifecycle_state: LifecycleState,
    pub raw_bytes: Bytes,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAssetResponse {
    pub id: Uuid,
    pub original_name: String,
    pub declared_mime_type: String,
    pub size_bytes: usize,
    pub size_bytes_formatted: String,
    pub received_at: DateTime<Utc>,
    pub integrity_valid: bool,
    pub corruption_kind: Option<CorruptionKind>,
    pub scan_result: ScanResult,
    pub quarantined: bool,
    pub access_token: String,
    pub lifecycle_state: LifecycleState,
}

impl From<&DocumentAsset> for DocumentAssetResponse {
    fn from(doc: &DocumentAsset) -> Self {
        DocumentAssetResponse {
            id: doc.id,
            original_name: doc.original_name.clone(),
            declared_mime_type: doc.declared_mime_type.clone(),
            size_bytes: doc.size_bytes,
            size_bytes_formatted: format_size(doc.size_bytes),
            received_at: doc.received_at,
            integrity_valid: doc.integrity_valid,
            corruption_kind: doc.corruption_kind,
            scan_result: doc.scan_result,
            quarantined: doc.scan_result.requires_quarantine(),
            access_token: doc.access_token.clone(),
            lifecycle_state: doc.lifecycle_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_response_from_document() {
        let doc = DocumentAsset {
            id: Uuid::new_v4(),
            original_name: "report.pdf".to_string(),
            declared_mime_type: "application/pdf".to_string(),
            size_bytes: 3 * 1024 * 1024,
            received_at: Utc::now(),
            integrity_valid: true,
            corruption_kind: None,
            scan_result: ScanResult::ScanUnavailable,
            access_token: "token".to_string(),
            lifecycle_state: LifecycleState::Completed,
            raw_bytes: Bytes::from_static(b"%PDF-1.4"),
        };

        let response = DocumentAssetResponse::from(&doc);
        let json = serde_json::to_value(&response).expect("serialize");

        assert_eq!(json["sizeBytesFormatted"], "3.00 MB");
        assert_eq!(json["scanResult"], "scan_unavailable");
        assert_eq!(json["quarantined"], true);
        assert_eq!(json["lifecycleState"], "completed");
        assert_eq!(json["integrityValid"], true);
        assert!(json["corruptionKind"].is_null());
        assert!(json.get("rawBytes").is_none());
    }

    #[test]
    fn test_only_scan_unavailable_requires_quarantine() {
        assert!(ScanResult::ScanUnavailable.requires_quarantine());
        assert!(!ScanResult::Clean.requires_quarantine());
        assert!(!ScanResult::Unscanned.requires_quarantine());
        assert!(!ScanResult::Infected.requires_quarantine());
    }

    #[test]
    fn test_corruption_kind_wire_names() {
        for kind in [
            CorruptionKind::InvalidHeader,
            CorruptionKind::BrokenXref,
            CorruptionKind::MissingTrailer,
            CorruptionKind::InvalidStructure,
            CorruptionKind::CorruptedObject,
            CorruptionKind::Other,
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.as_str());
        }
    }
}
