use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use futures::Stream;
use intake_core::models::{
    parse_asset_id, CancelResponse, ConversionResponse, DeclaredFile, ImageAsset,
    ImageAssetResponse,
};
use intake_core::{AppError, BoxError};
use intake_processing::{
    encode_data_uri, ingest_with_cancel, validate_png_structure, validate_signature, FileFormat,
};
use intake_storage::RecordStore;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::conversion::ConversionEngine;

/// PNG upload pipeline. Image uploads are not gated and may run concurrently.
#[derive(Clone)]
pub struct ImageUploadService {
    store: Arc<RecordStore<ImageAsset>>,
    converter: ConversionEngine,
    max_size: usize,
}

impl ImageUploadService {
    pub fn new(store: Arc<RecordStore<ImageAsset>>, max_size: usize) -> Self {
        Self {
            converter: ConversionEngine::new(Arc::clone(&store)),
            store,
            max_size,
        }
    }

    pub fn store(&self) -> &Arc<RecordStore<ImageAsset>> {
        &self.store
    }

    pub async fn upload<S, E>(
        &self,
        declared: DeclaredFile,
        stream: S,
    ) -> Result<ImageAssetResponse, AppError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<BoxError>,
    {
        self.upload_with_cancel(declared, stream, &CancellationToken::new())
            .await
    }

    pub async fn upload_with_cancel<S, E>(
        &self,
        declared: DeclaredFile,
        stream: S,
        cancel: &CancellationToken,
    ) -> Result<ImageAssetResponse, AppError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<BoxError>,
    {
        let data = ingest_with_cancel(stream, self.max_size, cancel)
            .await
            .map_err(|e| {
                tracing::debug!(
                    error = %e,
                    file_name = %declared.original_name,
                    "Image ingestion failed"
                );
                AppError::from(e)
            })?;

        self.accept(declared, data)
    }

    fn accept(&self, declared: DeclaredFile, data: Bytes) -> Result<ImageAssetResponse, AppError> {
        validate_signature(&data, FileFormat::Png)?;
        let metadata = validate_png_structure(&data)?;
        let preview_encoding = encode_data_uri(&data, FileFormat::Png.mime_type())?;

        let asset = ImageAsset {
            id: Uuid::new_v4(),
            original_name: declared.original_name,
            declared_mime_type: declared.declared_mime_type,
            size_bytes: data.len(),
            received_at: Utc::now(),
            metadata,
            preview_encoding,
            raw_bytes: data,
        };
        let response = ImageAssetResponse::from(&asset);

        self.store.add(asset)?;

        tracing::info!(
            asset_id = %response.id,
            size_bytes = response.size_bytes,
            width = response.width,
            height = response.height,
            "Image upload accepted"
        );
        Ok(response)
    }

    pub fn get(&self, raw_id: &str) -> Result<ImageAssetResponse, AppError> {
        let id = parse_asset_id(raw_id)?;
        self.store
            .get_by_id(id)
            .map(|asset| ImageAssetResponse::from(&asset))
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))
    }

    /// Remove a stored image and release its bytes.
    pub fn cancel(&self, raw_id: &str) -> Result<CancelResponse, AppError> {
        let id = parse_asset_id(raw_id)?;
        self.store
            .delete(id)
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

        tracing::info!(asset_id = %id, "Image removed");
        Ok(CancelResponse {
            id,
            message: "Image upload cancelled".to_string(),
        })
    }

    pub async fn convert(&self, raw_id: &str) -> Result<ConversionResponse, AppError> {
        let id = parse_asset_id(raw_id)?;
        self.converter.convert(id).await
    }
}
