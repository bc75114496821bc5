use std::sync::Arc;

use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreHealth {
    pub count: usize,
    pub capacity: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStoreHealth {
    pub count: usize,
    pub quarantined: usize,
    pub capacity: usize,
    pub upload_in_progress: bool,
    pub virus_scan_enabled: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub images: StoreHealth,
    pub documents: DocumentStoreHealth,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResponse<HealthResponse> {
    let images = state.images.store();
    let documents = state.documents.store();

    ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        images: StoreHealth {
            count: images.count(),
            capacity: images.capacity(),
        },
        documents: DocumentStoreHealth {
            count: documents.count(),
            quarantined: documents.quarantine_count(),
            capacity: documents.capacity(),
            upload_in_progress: documents.has_upload_in_progress(),
            virus_scan_enabled: state.documents.scanning_enabled(),
        },
    })
}
