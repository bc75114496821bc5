//! Application setup and initialization

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::Result;
use intake_core::Config;

use crate::state::AppState;

/// Initialize telemetry, services and routes.
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(environment = %config.environment, "Configuration loaded and validated");

    let state = Arc::new(AppState::from_config(config.clone())?);
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
