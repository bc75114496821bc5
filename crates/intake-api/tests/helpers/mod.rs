//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p intake-api`.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum_test::TestServer;
use intake_api::constants;
use intake_api::setup::routes;
use intake_api::state::AppState;
use intake_core::Config;

/// API path prefix for tests (e.g. `/api/v1`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config() -> Config {
    Config {
        max_image_size_bytes: 64 * 1024,
        max_document_size_bytes: 64 * 1024,
        ..Config::default()
    }
}

/// Test app with default in-memory stores and the placeholder scanner.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with_config(test_config())
}

pub fn setup_test_app_with_config(config: Config) -> TestApp {
    let state = AppState::from_config(config).expect("Failed to build app state");
    setup_test_app_with_state(state)
}

pub fn setup_test_app_with_state(state: AppState) -> TestApp {
    let state = Arc::new(state);
    let app = routes::setup_routes(&state.config, state.clone()).expect("Failed to build routes");
    let server = TestServer::new(app).expect("Failed to create test server");
    TestApp { server, state }
}
