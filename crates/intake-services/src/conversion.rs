//! Image to data URI conversion with integrity verification.

use std::sync::Arc;
use std::time::Instant;

use intake_core::models::{ConversionResponse, ImageAsset};
use intake_core::AppError;
use intake_processing::{
    check_integrity, data_uri_prefix, encode_data_uri, expected_encoded_size, read_png_metadata,
    validate_signature, FileFormat,
};
use intake_storage::RecordStore;
use uuid::Uuid;

#[derive(Clone)]
pub struct ConversionEngine {
    images: Arc<RecordStore<ImageAsset>>,
}

impl ConversionEngine {
    pub fn new(images: Arc<RecordStore<ImageAsset>>) -> Self {
        Self { images }
    }

    /// Re-encode a stored image as a `data:` URI.
    ///
    /// Header metadata is re-read from the stored bytes rather than taken
    /// from the record, so corruption after acceptance is still caught.
    pub async fn convert(&self, id: Uuid) -> Result<ConversionResponse, AppError> {
        let start = Instant::now();
        let asset = self
            .images
            .get_by_id(id)
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

        let raw = asset.raw_bytes.clone();
        drop(asset);

        validate_signature(&raw, FileFormat::Png).map_err(|e| {
            tracing::error!(asset_id = %id, error = %e, "Stored image lost its PNG signature");
            AppError::ConversionFailed("Stored image is not a valid PNG".to_string())
        })?;

        let metadata = read_png_metadata(&raw).map_err(|e| {
            tracing::error!(asset_id = %id, error = %e, "Out-of-range read in stored image");
            AppError::Memory(e.to_string())
        })?;

        let mime_type = FileFormat::Png.mime_type();
        let original_size = raw.len();
        let expected_size =
            expected_encoded_size(original_size, data_uri_prefix(mime_type).len());

        let data_uri = tokio::task::spawn_blocking(move || encode_data_uri(&raw, mime_type))
            .await
            .map_err(|e| {
                tracing::error!(asset_id = %id, error = %e, "Encoding task failed");
                AppError::ConversionFailed("Failed to encode image".to_string())
            })??;

        let check = match check_integrity(expected_size, data_uri.len()).into_result() {
            Ok(check) => check,
            Err(e) => {
                tracing::error!(
                    asset_id = %id,
                    error = %e,
                    "Converted image failed integrity check"
                );
                drop(data_uri);
                return Err(e);
            }
        };

        let conversion_time_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            asset_id = %id,
            original_size,
            actual_size = check.actual,
            conversion_time_ms,
            "Image converted"
        );

        Ok(ConversionResponse {
            id,
            mime_type: mime_type.to_string(),
            data_uri,
            original_size,
            expected_size: check.expected,
            actual_size: check.actual,
            difference: check.difference,
            integrity_valid: true,
            width: metadata.width,
            height: metadata.height,
            bit_depth: metadata.bit_depth,
            color_type: metadata.color_type,
            has_transparency: metadata.has_transparency,
            conversion_time_ms,
        })
    }
}
