//! Intake Services Layer
//!
//! Orchestration for the upload pipelines: malware scan coordination,
//! access token issuance, image conversion, and the per-format upload
//! services that compose processing and storage. The API crate depends on
//! this crate as its single service facade; keep HTTP concerns out of here.

pub mod conversion;
pub mod scan;
pub mod token;
pub mod upload;

pub use conversion::ConversionEngine;
pub use intake_storage::{RecordStore, StoreError};
pub use scan::{
    PlaceholderScanner, ScanCancelled, ScanCoordinator, ScanOutcome, ScanVerdict, VirusScanner,
    SCAN_TIMEOUT,
};
pub use token::{
    AccessTokenIssuer, PlainTokenIssuer, SignedTokenIssuer, TokenClaims, TokenError,
    ACCESS_TOKEN_TTL,
};
pub use upload::{DocumentUploadService, ImageUploadService};
