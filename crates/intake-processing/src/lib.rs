//! Intake Processing Library
//!
//! Format checks and byte-level transforms for uploaded files: bounded
//! ingestion, magic-byte signatures, PNG/PDF structural validation and
//! data-URI encoding.

pub mod cursor;
pub mod encoding;
pub mod ingest;
pub mod pdf;
pub mod png;
pub mod signature;

// Re-export commonly used types
pub use cursor::{ByteCursor, OutOfBounds};
pub use encoding::{
    check_integrity, data_uri_prefix, encode_data_uri, expected_encoded_size, EncodingError,
    IntegrityCheck,
};
pub use ingest::{ingest, ingest_with_cancel, IngestError, SizeGuard};
pub use pdf::{analyze_pdf, PdfCorruption, PdfValidation};
pub use png::{read_png_metadata, validate_png_structure};
pub use signature::{validate_signature, FileFormat, SignatureMismatch};
