//! PNG header inspection.
//!
//! Reads the IHDR fields at their fixed offsets behind the 8-byte signature
//! and the IHDR length/type words. No chunk CRCs are verified.

use intake_core::models::{ColorType, PngMetadata};
use intake_core::AppError;
use memchr::memmem;

use crate::cursor::{ByteCursor, OutOfBounds};

const WIDTH_OFFSET: usize = 16;
const HEIGHT_OFFSET: usize = 20;
const BIT_DEPTH_OFFSET: usize = 24;
const COLOR_TYPE_OFFSET: usize = 25;

const TRANSPARENCY_CHUNK: &[u8] = b"tRNS";

/// Extract header metadata, reporting the first read that falls outside the buffer.
pub fn read_png_metadata(data: &[u8]) -> Result<PngMetadata, OutOfBounds> {
    let cursor = ByteCursor::new(data);

    let width = cursor.u32_be_at(WIDTH_OFFSET)?;
    let height = cursor.u32_be_at(HEIGHT_OFFSET)?;
    let bit_depth = cursor.u8_at(BIT_DEPTH_OFFSET)?;
    let color_type = ColorType::from_code(cursor.u8_at(COLOR_TYPE_OFFSET)?);

    let has_transparency =
        color_type.has_alpha_channel() || memmem::find(data, TRANSPARENCY_CHUNK).is_some();

    Ok(PngMetadata {
        width,
        height,
        bit_depth,
        color_type,
        has_transparency,
    })
}

/// Upload-time structural check: a truncated header means a corrupted file.
pub fn validate_png_structure(data: &[u8]) -> Result<PngMetadata, AppError> {
    read_png_metadata(data).map_err(|e| {
        tracing::debug!(error = %e, "PNG header truncated");
        AppError::CorruptedFile {
            kind: None,
            message: "PNG header is truncated or unreadable".to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::PNG_SIGNATURE;

    fn header(width: u32, height: u32, bit_depth: u8, color_type: u8) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[bit_depth, color_type, 0, 0, 0]);
        data
    }

    #[test]
    fn test_reads_ihdr_fields() {
        let meta = read_png_metadata(&header(640, 480, 8, 2)).unwrap();
        assert_eq!(meta.width, 640);
        assert_eq!(meta.height, 480);
        assert_eq!(meta.bit_depth, 8);
        assert_eq!(meta.color_type, ColorType::Rgb);
        assert!(!meta.has_transparency);
    }

    #[test]
    fn test_alpha_color_types_are_transparent() {
        assert!(read_png_metadata(&header(1, 1, 8, 6)).unwrap().has_transparency);
        assert!(read_png_metadata(&header(1, 1, 8, 4)).unwrap().has_transparency);
    }

    #[test]
    fn test_trns_chunk_marks_transparency() {
        let mut data = header(1, 1, 8, 3);
        data.extend_from_slice(&2u32.to_be_bytes());
        data.extend_from_slice(b"tRNS");
        data.extend_from_slice(&[0, 0]);
        let meta = read_png_metadata(&data).unwrap();
        assert_eq!(meta.color_type, ColorType::Indexed);
        assert!(meta.has_transparency);
    }

    #[test]
    fn test_unknown_color_type_is_tolerated() {
        let meta = read_png_metadata(&header(1, 1, 8, 9)).unwrap();
        assert_eq!(meta.color_type, ColorType::Unknown);
    }

    #[test]
    fn test_truncated_header_is_corrupted() {
        let data = header(1, 1, 8, 2);
        let err = read_png_metadata(&data[..25]).unwrap_err();
        assert_eq!(err.offset, COLOR_TYPE_OFFSET);

        let err = validate_png_structure(&PNG_SIGNATURE).unwrap_err();
        assert!(matches!(err, AppError::CorruptedFile { kind: None, .. }));
    }
}
