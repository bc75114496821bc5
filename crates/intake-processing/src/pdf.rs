//! PDF marker analysis.
//!
//! The buffer is treated as one character per byte, so binary stream content
//! never disturbs the search. Checks run in a fixed order and the first
//! failure is the one reported.

use std::sync::LazyLock;

use intake_core::models::CorruptionKind;
use intake_core::AppError;
use memchr::memmem;
use regex::bytes::Regex;

use crate::signature::PDF_SIGNATURE;

static OBJECT_HEADER: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?-u)\d+\s+\d+\s+obj"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct PdfCorruption {
    pub kind: CorruptionKind,
    pub message: String,
}

impl PdfCorruption {
    fn new(kind: CorruptionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<PdfCorruption> for AppError {
    fn from(err: PdfCorruption) -> Self {
        AppError::CorruptedFile {
            kind: Some(err.kind),
            message: err.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfValidation {
    pub valid: bool,
    pub corruption: Option<PdfCorruption>,
}

impl PdfValidation {
    pub fn into_result(self) -> Result<(), PdfCorruption> {
        match self.corruption {
            Some(corruption) => Err(corruption),
            None => Ok(()),
        }
    }
}

fn contains(data: &[u8], token: &[u8]) -> bool {
    memmem::find(data, token).is_some()
}

fn first_corruption(data: &[u8]) -> Result<(), PdfCorruption> {
    if !data.starts_with(&PDF_SIGNATURE) {
        return Err(PdfCorruption::new(
            CorruptionKind::InvalidHeader,
            "PDF header is missing or invalid",
        ));
    }
    if !contains(data, b"xref") {
        return Err(PdfCorruption::new(
            CorruptionKind::BrokenXref,
            "PDF cross-reference table is missing",
        ));
    }
    if !contains(data, b"trailer") {
        return Err(PdfCorruption::new(
            CorruptionKind::MissingTrailer,
            "PDF trailer is missing",
        ));
    }
    if !contains(data, b"startxref") {
        return Err(PdfCorruption::new(
            CorruptionKind::InvalidStructure,
            "PDF startxref marker is missing",
        ));
    }
    if !contains(data, b"%%EOF") {
        return Err(PdfCorruption::new(
            CorruptionKind::InvalidStructure,
            "PDF end-of-file marker is missing",
        ));
    }

    let pattern = OBJECT_HEADER.as_ref().map_err(|e| {
        PdfCorruption::new(
            CorruptionKind::Other,
            format!("PDF analysis failed: {}", e),
        )
    })?;
    if !pattern.is_match(data) {
        return Err(PdfCorruption::new(
            CorruptionKind::CorruptedObject,
            "PDF contains no readable object headers",
        ));
    }

    Ok(())
}

/// Run the ordered marker checks over a complete PDF buffer.
pub fn analyze_pdf(data: &[u8]) -> PdfValidation {
    match first_corruption(data) {
        Ok(()) => PdfValidation {
            valid: true,
            corruption: None,
        },
        Err(corruption) => {
            tracing::debug!(kind = %corruption.kind, "PDF structural check failed");
            PdfValidation {
                valid: false,
                corruption: Some(corruption),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n\
xref\n0 1\n0000000000 65535 f \ntrailer\n<< /Root 1 0 R >>\nstartxref\n9\n%%EOF\n";

    fn kind_of(data: &[u8]) -> Option<CorruptionKind> {
        analyze_pdf(data).corruption.map(|c| c.kind)
    }

    #[test]
    fn test_well_formed_pdf_is_valid() {
        let result = analyze_pdf(WELL_FORMED);
        assert!(result.valid);
        assert!(result.corruption.is_none());
    }

    #[test]
    fn test_binary_stream_content_does_not_disturb_checks() {
        let mut data = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n".to_vec();
        data.extend_from_slice(&[0xFF, 0x00, 0xC3, 0x28, 0x80]);
        data.extend_from_slice(&WELL_FORMED[9..]);
        assert!(analyze_pdf(&data).valid);
    }

    #[test]
    fn test_bad_header() {
        assert_eq!(
            kind_of(b"PDF-1.4 xref trailer startxref %%EOF 1 0 obj"),
            Some(CorruptionKind::InvalidHeader)
        );
    }

    #[test]
    fn test_first_failing_check_wins() {
        // Missing both xref and trailer reports the xref problem.
        assert_eq!(kind_of(b"%PDF-1.4\n1 0 obj\n%%EOF"), Some(CorruptionKind::BrokenXref));
    }

    #[test]
    fn test_startxref_alone_satisfies_xref_probe() {
        let data = b"%PDF-1.4\n1 0 obj\nstartxref\n0\n%%EOF";
        assert_eq!(kind_of(data), Some(CorruptionKind::MissingTrailer));
    }

    #[test]
    fn test_missing_trailing_markers() {
        assert_eq!(
            kind_of(b"%PDF-1.4\n1 0 obj\nxref\ntrailer\n%%EOF"),
            Some(CorruptionKind::InvalidStructure)
        );
        assert_eq!(
            kind_of(b"%PDF-1.4\n1 0 obj\nxref\ntrailer\nstartxref\n0\n"),
            Some(CorruptionKind::InvalidStructure)
        );
    }

    #[test]
    fn test_missing_object_headers() {
        let data = b"%PDF-1.4\nxref\ntrailer\nstartxref\n0\n%%EOF";
        assert_eq!(kind_of(data), Some(CorruptionKind::CorruptedObject));
    }

    #[test]
    fn test_corruption_converts_to_app_error() {
        let err: AppError = analyze_pdf(b"%PDF-1.4\n").into_result().unwrap_err().into();
        assert!(matches!(
            err,
            AppError::CorruptedFile {
                kind: Some(CorruptionKind::BrokenXref),
                ..
            }
        ));
    }
}
