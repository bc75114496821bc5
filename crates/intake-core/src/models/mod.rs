//! Domain models for uploaded assets and their boundary responses.
//!
//! Stored asset structs own the raw upload bytes and deliberately do not
//! implement `Serialize`; only the `*Response` projections reach the wire.

pub mod document;
pub mod image;
pub mod upload;

pub use document::{
    CorruptionKind, DocumentAsset, DocumentAssetResponse, LifecycleState, ScanResult,
};
pub use image::{ColorType, ConversionResponse, ImageAsset, ImageAssetResponse, PngMetadata};
pub use upload::{CancelResponse, DeclaredFile};

use uuid::Uuid;

use crate::error::AppError;

/// Parse a boundary-supplied asset identifier.
///
/// Only the hyphenated UUID form is accepted; anything else is rejected
/// before any store lookup happens.
pub fn parse_asset_id(raw: &str) -> Result<Uuid, AppError> {
    let trimmed = raw.trim();
    if trimmed.len() != 36 {
        return Err(AppError::Validation(format!("Invalid asset id: {}", raw)));
    }
    Uuid::parse_str(trimmed).map_err(|_| AppError::Validation(format!("Invalid asset id: {}", raw)))
}
