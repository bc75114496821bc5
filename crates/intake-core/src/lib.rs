//! Intake Core Library
//!
//! This crate provides the domain models, error taxonomy and configuration
//! shared by every Intake component.

pub mod config;
pub mod error;
pub mod models;
pub mod size;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, BoxError, ErrorMetadata, LogLevel};
pub use size::format_size;
