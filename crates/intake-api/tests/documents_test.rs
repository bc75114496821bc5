//! Document API integration tests.
//!
//! Run with: `cargo test -p intake-api --test documents_test`

mod helpers;

use std::sync::Arc;

use bytes::Bytes;
use helpers::{
    api_path, fixtures, setup_test_app, setup_test_app_with_config, setup_test_app_with_state,
    test_config,
};
use intake_api::state::AppState;
use intake_core::Config;
use intake_services::{
    DocumentUploadService, PlaceholderScanner, PlainTokenIssuer, RecordStore, ScanCoordinator,
    SCAN_TIMEOUT,
};
use serde_json::Value;
use uuid::Uuid;

async fn upload_pdf(app: &helpers::TestApp, data: Vec<u8>) -> axum_test::TestResponse {
    app.client()
        .post(&api_path("/documents"))
        .add_header("content-type", "application/pdf")
        .add_header("x-file-name", "report.pdf")
        .bytes(Bytes::from(data))
        .await
}

#[tokio::test]
async fn test_upload_clean_document() {
    let app = setup_test_app();
    let response = upload_pdf(&app, fixtures::create_test_pdf()).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let data = &body["data"];
    assert_eq!(data["integrityValid"], true);
    assert_eq!(data["scanResult"], "clean");
    assert_eq!(data["quarantined"], false);
    assert_eq!(data["lifecycleState"], "completed");
    assert!(!data["accessToken"].as_str().unwrap().is_empty());

    let id = data["id"].as_str().unwrap();
    let get = app
        .client()
        .get(&api_path(&format!("/documents/{}", id)))
        .await;
    assert_eq!(get.status_code(), 200);
    assert_eq!(get.json::<Value>()["data"]["originalName"], "report.pdf");
    assert!(!app.state.documents.store().has_upload_in_progress());
}

#[tokio::test]
async fn test_upload_corrupted_document() {
    let app = setup_test_app();
    let response = upload_pdf(&app, b"%PDF-1.4\n1 0 obj\nendobj\n%%EOF".to_vec()).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "CORRUPTED_FILE");
    assert_eq!(body["error"]["details"]["corruptionKind"], "broken_xref");
    assert_eq!(app.state.documents.store().count(), 0);
}

#[tokio::test]
async fn test_upload_rejected_while_another_is_in_flight() {
    let app = setup_test_app();
    app.state
        .documents
        .store()
        .set_upload_in_progress(Uuid::new_v4());

    let response = upload_pdf(&app, fixtures::create_test_pdf()).await;
    assert_eq!(response.status_code(), 409);
    assert_eq!(response.json::<Value>()["error"]["code"], "UPLOAD_IN_PROGRESS");

    app.state.documents.store().clear_upload_in_progress();
    let response = upload_pdf(&app, fixtures::create_test_pdf()).await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_upload_over_limit_clears_gate() {
    let pdf = fixtures::create_test_pdf();
    let app = setup_test_app_with_config(Config {
        max_document_size_bytes: pdf.len() - 1,
        ..test_config()
    });

    let response = upload_pdf(&app, pdf).await;
    assert_eq!(response.status_code(), 413);
    assert_eq!(app.state.documents.store().count(), 0);
    assert!(!app.state.documents.store().has_upload_in_progress());
}

#[tokio::test]
async fn test_upload_unscanned_when_scanning_disabled() {
    let app = setup_test_app_with_config(Config {
        virus_scan_enabled: false,
        ..test_config()
    });

    let response = upload_pdf(&app, fixtures::create_test_pdf()).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["data"]["scanResult"], "unscanned");
}

#[tokio::test(start_paused = true)]
async fn test_slow_scan_quarantines_document() {
    let config = test_config();
    let mut state = AppState::from_config(config.clone()).unwrap();
    state.documents = DocumentUploadService::new(
        Arc::new(RecordStore::with_quarantine(config.max_records)),
        Some(ScanCoordinator::new(Arc::new(PlaceholderScanner::with_delay(
            SCAN_TIMEOUT * 3,
        )))),
        Arc::new(PlainTokenIssuer),
        config.max_document_size_bytes,
    );
    let app = setup_test_app_with_state(state);

    let response = upload_pdf(&app, fixtures::create_test_pdf()).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["data"]["scanResult"], "scan_unavailable");
    assert_eq!(body["data"]["quarantined"], true);

    let id = body["data"]["id"].as_str().unwrap();
    let get = app
        .client()
        .get(&api_path(&format!("/documents/{}", id)))
        .await;
    assert_eq!(get.status_code(), 200);
    assert_eq!(app.state.documents.store().quarantine_count(), 1);

    let delete = app
        .client()
        .delete(&api_path(&format!("/documents/{}", id)))
        .await;
    assert_eq!(delete.status_code(), 200);
    assert_eq!(app.state.documents.store().count(), 0);
}

#[tokio::test]
async fn test_cancel_unknown_document() {
    let app = setup_test_app();
    let response = app
        .client()
        .delete(&api_path(&format!("/documents/{}", Uuid::new_v4())))
        .await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
