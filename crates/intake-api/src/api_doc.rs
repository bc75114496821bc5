//! OpenAPI documentation.

use axum::Json;
use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use intake_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Intake API",
        version = "0.1.0",
        description = "Validated ingestion of PNG images and PDF documents with malware screening, transient in-memory storage and data URI conversion. Upload bodies are raw bytes; success responses are wrapped as {success: true, data}."
    ),
    paths(
        handlers::image::upload_image,
        handlers::image::get_image,
        handlers::image::cancel_image,
        handlers::image::convert_image,
        handlers::document::upload_document,
        handlers::document::get_document,
        handlers::document::cancel_document,
        handlers::health::health_check,
    ),
    components(schemas(
        models::ImageAssetResponse,
        models::DocumentAssetResponse,
        models::ConversionResponse,
        models::CancelResponse,
        models::ColorType,
        models::CorruptionKind,
        models::ScanResult,
        models::LifecycleState,
        error::ErrorResponse,
        error::ErrorBody,
        handlers::health::HealthResponse,
        handlers::health::StoreHealth,
        handlers::health::DocumentStoreHealth,
    )),
    tags(
        (name = "images", description = "PNG upload, lookup, removal and conversion"),
        (name = "documents", description = "PDF upload, lookup and removal"),
        (name = "health", description = "Service status")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
