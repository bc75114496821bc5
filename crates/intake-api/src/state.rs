//! Application state shared by all handlers.

use std::sync::Arc;

use anyhow::Context;
use intake_core::models::{DocumentAsset, ImageAsset};
use intake_core::Config;
use intake_services::{
    AccessTokenIssuer, DocumentUploadService, ImageUploadService, PlaceholderScanner,
    PlainTokenIssuer, RecordStore, ScanCoordinator, SignedTokenIssuer,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub images: ImageUploadService,
    pub documents: DocumentUploadService,
}

impl AppState {
    /// Build the stores and upload services described by `config`.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let image_store: Arc<RecordStore<ImageAsset>> =
            Arc::new(RecordStore::new(config.max_records));
        let document_store: Arc<RecordStore<DocumentAsset>> =
            Arc::new(RecordStore::with_quarantine(config.max_records));

        let scanner = if config.virus_scan_enabled {
            Some(ScanCoordinator::new(Arc::new(PlaceholderScanner::new())))
        } else {
            tracing::warn!("Virus scanning disabled, documents will be stored unscanned");
            None
        };

        let tokens: Arc<dyn AccessTokenIssuer> = match &config.access_token_secret {
            Some(secret) => Arc::new(
                SignedTokenIssuer::new(secret.as_bytes())
                    .context("Failed to initialize access token signer")?,
            ),
            None => Arc::new(PlainTokenIssuer),
        };

        Ok(Self {
            images: ImageUploadService::new(image_store, config.max_image_size_bytes),
            documents: DocumentUploadService::new(
                document_store,
                scanner,
                tokens,
                config.max_document_size_bytes,
            ),
            config,
        })
    }
}
