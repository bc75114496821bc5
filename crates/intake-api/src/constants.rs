//! API constants

/// Versioned prefix for every upload route.
pub const API_PREFIX: &str = "/api/v1";

/// Header carrying the client-declared original file name (percent-encoded).
pub const FILE_NAME_HEADER: &str = "x-file-name";

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";
