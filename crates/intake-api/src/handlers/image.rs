use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::HeaderMap,
};
use intake_core::models::{CancelResponse, ConversionResponse, ImageAssetResponse};

use crate::error::{ApiResponse, ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::declared_file;

#[utoipa::path(
    post,
    path = "/api/v1/images",
    tag = "images",
    request_body(content = Vec<u8>, content_type = "image/png", description = "Raw PNG bytes"),
    params(
        ("X-File-Name" = Option<String>, Header, description = "Percent-encoded original file name")
    ),
    responses(
        (status = 200, description = "Image accepted", body = ImageAssetResponse),
        (status = 400, description = "Empty, non-PNG or corrupted upload", body = ErrorResponse),
        (status = 413, description = "Image exceeds the size limit", body = ErrorResponse),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    )
)]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Body,
) -> Result<ApiResponse<ImageAssetResponse>, HttpAppError> {
    let declared = declared_file(&headers);
    let image = state
        .images
        .upload(declared, body.into_data_stream())
        .await?;
    Ok(ApiResponse::ok(image))
}

#[utoipa::path(
    get,
    path = "/api/v1/images/{id}",
    tag = "images",
    params(("id" = String, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image found", body = ImageAssetResponse),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<ImageAssetResponse>, HttpAppError> {
    Ok(ApiResponse::ok(state.images.get(&id)?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/images/{id}",
    tag = "images",
    params(("id" = String, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image removed", body = CancelResponse),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
pub async fn cancel_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<CancelResponse>, HttpAppError> {
    Ok(ApiResponse::ok(state.images.cancel(&id)?))
}

#[utoipa::path(
    post,
    path = "/api/v1/images/{id}/convert",
    tag = "images",
    params(("id" = String, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Image converted to a data URI", body = ConversionResponse),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Image not found", body = ErrorResponse),
        (status = 500, description = "Conversion, integrity or memory error", body = ErrorResponse)
    )
)]
pub async fn convert_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<ConversionResponse>, HttpAppError> {
    Ok(ApiResponse::ok(state.images.convert(&id).await?))
}
