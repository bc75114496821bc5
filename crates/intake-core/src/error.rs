//! Error types module
//!
//! This module provides the error taxonomy shared by every Intake component.
//! Pipeline stages raise their own narrow errors; all of them converge on
//! `AppError`, whose variants map one-to-one onto the machine-readable codes
//! surfaced at the service boundary.

use serde_json::json;

use crate::models::CorruptionKind;
use crate::size::format_size;

/// Boxed error used to carry an underlying cause for diagnostics.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for content-policy rejections
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "FILE_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Structured diagnostic details, if the error carries any
    fn details(&self) -> Option<serde_json::Value>;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("File too large: exceeds limit of {limit} bytes")]
    FileTooLarge { limit: usize },

    #[error("Corrupted file: {message}")]
    CorruptedFile {
        kind: Option<CorruptionKind>,
        message: String,
    },

    #[error("Malware detected: {0}")]
    MalwareDetected(String),

    #[error("Upload failed: {message}")]
    UploadFailed {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Another document upload is already in progress")]
    UploadInProgress,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Integrity check failed: expected {expected} bytes, got {actual} bytes")]
    Integrity {
        expected: usize,
        actual: usize,
        difference: usize,
    },

    #[error("Memory access error: {0}")]
    Memory(String),
}

impl AppError {
    /// Upload failure with an underlying cause preserved for diagnostics.
    pub fn upload_failed(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        AppError::UploadFailed {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Get the error type name for log records
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::InvalidFileType(_) => "InvalidFileType",
            AppError::FileTooLarge { .. } => "FileTooLarge",
            AppError::CorruptedFile { .. } => "CorruptedFile",
            AppError::MalwareDetected(_) => "MalwareDetected",
            AppError::UploadFailed { .. } => "UploadFailed",
            AppError::UploadInProgress => "UploadInProgress",
            AppError::NotFound(_) => "NotFound",
            AppError::ConversionFailed(_) => "ConversionFailed",
            AppError::Integrity { .. } => "Integrity",
            AppError::Memory(_) => "Memory",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::Validation(_) => (400, "VALIDATION_ERROR", false, LogLevel::Debug),
        AppError::InvalidFileType(_) => (400, "INVALID_FILE_TYPE", false, LogLevel::Debug),
        AppError::FileTooLarge { .. } => (413, "FILE_TOO_LARGE", false, LogLevel::Debug),
        AppError::CorruptedFile { .. } => (400, "CORRUPTED_FILE", false, LogLevel::Warn),
        AppError::MalwareDetected(_) => (400, "MALWARE_DETECTED", false, LogLevel::Warn),
        AppError::UploadFailed { .. } => (500, "UPLOAD_FAILED", false, LogLevel::Error),
        AppError::UploadInProgress => (409, "UPLOAD_IN_PROGRESS", false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::ConversionFailed(_) => (500, "CONVERSION_FAILED", false, LogLevel::Error),
        AppError::Integrity { .. } => (500, "INTEGRITY_ERROR", false, LogLevel::Error),
        AppError::Memory(_) => (500, "MEMORY_ERROR", true, LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(ref msg) => msg.clone(),
            AppError::InvalidFileType(ref msg) => msg.clone(),
            AppError::FileTooLarge { limit } => {
                format!("File exceeds the maximum size of {}", format_size(*limit))
            }
            AppError::CorruptedFile { ref message, .. } => message.clone(),
            AppError::MalwareDetected(_) => "File rejected: malware detected".to_string(),
            AppError::UploadFailed { ref message, .. } => message.clone(),
            AppError::UploadInProgress => {
                "Another document upload is already in progress".to_string()
            }
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::ConversionFailed(ref msg) => msg.clone(),
            AppError::Integrity { .. } => {
                "Converted output failed the size integrity check".to_string()
            }
            AppError::Memory(_) => "Failed to read image data".to_string(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::FileTooLarge { limit } => Some(json!({
                "maxSizeBytes": limit,
                "maxSize": format_size(*limit),
            })),
            AppError::CorruptedFile {
                kind: Some(kind), ..
            } => Some(json!({ "corruptionKind": kind })),
            AppError::MalwareDetected(ref signature) => Some(json!({ "signature": signature })),
            AppError::UploadFailed {
                source: Some(ref source),
                ..
            } => Some(json!({ "cause": source.to_string() })),
            AppError::Integrity {
                expected,
                actual,
                difference,
            } => Some(json!({
                "expectedSize": expected,
                "actualSize": actual,
                "difference": difference,
            })),
            AppError::Memory(ref msg) => Some(json!({ "cause": msg })),
            _ => None,
        }
    }
}
