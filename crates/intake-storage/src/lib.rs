//! Intake Storage Library
//!
//! Transient, in-memory record storage for accepted uploads.
//!
//! # Partitions
//!
//! Every store has a bounded primary partition. Document stores also carry a
//! quarantine partition (same ceiling, separate counter) for files whose
//! malware scan could not complete. Lookups consult primary first, then
//! quarantine.
//!
//! Nothing here survives a process restart.

pub mod record;
pub mod store;

// Re-export commonly used types
pub use record::Record;
pub use store::{RecordStore, StoreError, StoreResult, UploadGate};
