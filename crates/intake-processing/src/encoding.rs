//! Data URI encoding with a size-based integrity check.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use intake_core::AppError;

/// Allowed deviation of the encoded length from the expected length.
const INTEGRITY_TOLERANCE: f64 = 0.01;

#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("Encoded output length overflows for an input of {0} bytes")]
    Overflow(usize),
}

impl From<EncodingError> for AppError {
    fn from(err: EncodingError) -> Self {
        AppError::ConversionFailed(err.to_string())
    }
}

pub fn data_uri_prefix(mime_type: &str) -> String {
    format!("data:{};base64,", mime_type)
}

/// `ceil(len * 4 / 3) + prefix_len`, the modeled size of a data URI.
pub fn expected_encoded_size(len: usize, prefix_len: usize) -> usize {
    len.saturating_mul(4)
        .div_ceil(3)
        .saturating_add(prefix_len)
}

/// Base64-encode `data` behind a `data:<mime>;base64,` prefix.
pub fn encode_data_uri(data: &[u8], mime_type: &str) -> Result<String, EncodingError> {
    let prefix = data_uri_prefix(mime_type);
    let body_len =
        base64::encoded_len(data.len(), true).ok_or(EncodingError::Overflow(data.len()))?;

    let mut out = String::with_capacity(prefix.len() + body_len);
    out.push_str(&prefix);
    STANDARD.encode_string(data, &mut out);
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegrityCheck {
    pub expected: usize,
    pub actual: usize,
    pub difference: usize,
    pub within_tolerance: bool,
}

impl IntegrityCheck {
    pub fn into_result(self) -> Result<Self, AppError> {
        if self.within_tolerance {
            Ok(self)
        } else {
            Err(AppError::Integrity {
                expected: self.expected,
                actual: self.actual,
                difference: self.difference,
            })
        }
    }
}

/// Compare an encoded length against [`expected_encoded_size`] within a 1%
/// tolerance.
///
/// Padded base64 can run up to two characters past the estimate, so a small
/// PNG whose byte length is not a multiple of 3 (a 67-byte 1x1 image, for
/// instance) falls outside the tolerance and is rejected.
pub fn check_integrity(expected: usize, actual: usize) -> IntegrityCheck {
    let difference = expected.abs_diff(actual);
    IntegrityCheck {
        expected,
        actual,
        difference,
        within_tolerance: difference as f64 <= INTEGRITY_TOLERANCE * expected as f64,
    }
}
