//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use intake_core::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa_rapidoc::RapiDoc;

use crate::api_doc::openapi_json;
use crate::constants::{API_PREFIX, OPENAPI_JSON_PATH};
use crate::handlers::{document, health, image};
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let api_routes = Router::new()
        .route("/images", post(image::upload_image))
        .route(
            "/images/{id}",
            get(image::get_image).delete(image::cancel_image),
        )
        .route("/images/{id}/convert", post(image::convert_image))
        .route("/documents", post(document::upload_document))
        .route(
            "/documents/{id}",
            get(document::get_document).delete(document::cancel_document),
        );

    let app = Router::new()
        .nest(API_PREFIX, api_routes)
        .route("/health", get(health::health_check))
        .route(OPENAPI_JSON_PATH, get(openapi_json))
        .merge(RapiDoc::new(OPENAPI_JSON_PATH).path("/docs"))
        // Upload size is enforced while streaming by the upload services.
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
