use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::HeaderMap,
};
use intake_core::models::{CancelResponse, DocumentAssetResponse};

use crate::error::{ApiResponse, ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::declared_file;

/// Only one document upload is processed at a time; a concurrent attempt is
/// rejected with 409 before its body is read.
#[utoipa::path(
    post,
    path = "/api/v1/documents",
    tag = "documents",
    request_body(content = Vec<u8>, content_type = "application/pdf", description = "Raw PDF bytes"),
    params(
        ("X-File-Name" = Option<String>, Header, description = "Percent-encoded original file name")
    ),
    responses(
        (status = 200, description = "Document stored, or quarantined when the scan was inconclusive", body = DocumentAssetResponse),
        (status = 400, description = "Empty, non-PDF, corrupted or infected upload", body = ErrorResponse),
        (status = 409, description = "Another document upload is in progress", body = ErrorResponse),
        (status = 413, description = "Document exceeds the size limit", body = ErrorResponse),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Body,
) -> Result<ApiResponse<DocumentAssetResponse>, HttpAppError> {
    let declared = declared_file(&headers);
    let document = state
        .documents
        .upload(declared, body.into_data_stream())
        .await?;
    Ok(ApiResponse::ok(document))
}

#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}",
    tag = "documents",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document found", body = DocumentAssetResponse),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<DocumentAssetResponse>, HttpAppError> {
    Ok(ApiResponse::ok(state.documents.get(&id)?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/documents/{id}",
    tag = "documents",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document removed", body = CancelResponse),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn cancel_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<CancelResponse>, HttpAppError> {
    Ok(ApiResponse::ok(state.documents.cancel(&id)?))
}
