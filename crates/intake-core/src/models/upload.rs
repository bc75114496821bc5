use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

const UNKNOWN_NAME: &str = "unknown";
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Client-declared provenance for an upload. Advisory only: the format is
/// always decided from the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredFile {
    pub original_name: String,
    pub declared_mime_type: String,
}

impl DeclaredFile {
    pub fn new(original_name: Option<String>, declared_mime_type: Option<String>) -> Self {
        Self {
            original_name: original_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            declared_mime_type: declared_mime_type
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CancelResponse {
    pub id: Uuid,
    pub message: String,
}
