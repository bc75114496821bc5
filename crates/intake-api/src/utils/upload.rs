use axum::http::{header, HeaderMap};
use intake_core::models::DeclaredFile;
use percent_encoding::percent_decode_str;

use crate::constants::FILE_NAME_HEADER;

fn header_str<'a>(headers: &'a HeaderMap, name: impl header::AsHeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Read the client-declared name and MIME type from request headers.
///
/// The name is percent-decoded; both values are otherwise passed through
/// untouched since they are only kept for provenance.
pub fn declared_file(headers: &HeaderMap) -> DeclaredFile {
    let original_name = header_str(headers, FILE_NAME_HEADER)
        .map(|raw| percent_decode_str(raw).decode_utf8_lossy().into_owned());
    let declared_mime_type = header_str(headers, header::CONTENT_TYPE).map(str::to_string);

    DeclaredFile::new(original_name, declared_mime_type)
}
