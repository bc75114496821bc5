//! Magic-byte signature checks.
//!
//! Only the leading bytes decide the format; declared MIME types and file
//! extensions are provenance metadata and are never consulted here.

use intake_core::AppError;

use crate::cursor::ByteCursor;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
pub const PDF_SIGNATURE: [u8; 5] = *b"%PDF-";

/// Upload formats accepted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Png,
    Pdf,
}

impl FileFormat {
    pub fn signature(&self) -> &'static [u8] {
        match self {
            FileFormat::Png => &PNG_SIGNATURE,
            FileFormat::Pdf => &PDF_SIGNATURE,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            FileFormat::Png => "image/png",
            FileFormat::Pdf => "application/pdf",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileFormat::Png => "PNG",
            FileFormat::Pdf => "PDF",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("File content does not carry a {} signature", .expected.name())]
pub struct SignatureMismatch {
    pub expected: FileFormat,
}

impl From<SignatureMismatch> for AppError {
    fn from(err: SignatureMismatch) -> Self {
        AppError::InvalidFileType(format!(
            "Invalid file type: only {} files are accepted",
            err.expected.name()
        ))
    }
}

/// Compare the leading bytes of `data` against the format's magic constant.
pub fn validate_signature(data: &[u8], format: FileFormat) -> Result<(), SignatureMismatch> {
    if ByteCursor::new(data).starts_with(format.signature()) {
        Ok(())
    } else {
        Err(SignatureMismatch { expected: format })
    }
}
