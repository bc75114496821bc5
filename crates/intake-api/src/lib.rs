//! Intake API Library
//!
//! Thin HTTP surface over the upload services: routing, response envelopes,
//! error rendering, telemetry and server bootstrap.

mod api_doc;
mod handlers;
mod telemetry;
mod utils;

pub mod constants;
pub mod error;
pub mod setup;
pub mod state;

pub use error::{ApiResponse, ErrorBody, ErrorResponse, HttpAppError};
pub use telemetry::init_telemetry;
