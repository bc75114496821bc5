use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::size::format_size;

/// PNG color type as declared in the IHDR header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ColorType {
    Grayscale,
    Rgb,
    Indexed,
    GrayscaleAlpha,
    Rgba,
    Unknown,
}

impl ColorType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => ColorType::Grayscale,
            2 => ColorType::Rgb,
            3 => ColorType::Indexed,
            4 => ColorType::GrayscaleAlpha,
            6 => ColorType::Rgba,
            _ => ColorType::Unknown,
        }
    }

    /// Whether the color model itself carries an alpha channel.
    pub fn has_alpha_channel(&self) -> bool {
        matches!(self, ColorType::GrayscaleAlpha | ColorType::Rgba)
    }
}

/// Structural metadata read from a PNG header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngMetadata {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: ColorType,
    pub has_transparency: bool,
}

/// An accepted PNG upload held by the image store.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub id: Uuid,
    pub original_name: String,
    pub declared_mime_type: String,
    pub size_bytes: usize,
    pub received_at: DateTime<Utc>,
    pub metadata: PngMetadata,
    pub preview_encoding: String,
    pub raw_bytes: Bytes,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageAssetResponse {
    pub id: Uuid,
    pub original_name: String,
    pub declared_mime_type: String,
    pub size_bytes: usize,
    pub size_bytes_formatted: String,
    pub received_at: DateTime<Utc>,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: ColorType,
    pub has_transparency: bool,
    pub preview_encoding: String,
}

impl From<&ImageAsset> for ImageAssetResponse {
    fn from(asset: &ImageAsset) -> Self {
        ImageAssetResponse {
            id: asset.id,
            original_name: asset.original_name.clone(),
            declared_mime_type: asset.declared_mime_type.clone(),
            size_bytes: asset.size_bytes,
            size_bytes_formatted: format_size(asset.size_bytes),
            received_at: asset.received_at,
            width: asset.metadata.width,
            height: asset.metadata.height,
            bit_depth: asset.metadata.bit_depth,
            color_type: asset.metadata.color_type,
            has_transparency: asset.metadata.has_transparency,
            preview_encoding: asset.preview_encoding.clone(),
        }
    }
}

/// Result of re-encoding a stored image to a data URI.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    pub id: Uuid,
    pub mime_type: String,
    pub data_uri: String,
    pub original_size: usize,
    pub expected_size: usize,
    pub actual_size: usize,
    pub difference: usize,
    pub integrity_valid: bool,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: ColorType,
    pub has_transparency: bool,
    pub conversion_time_ms: u64,
}
