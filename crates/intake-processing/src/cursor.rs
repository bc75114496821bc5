//! Bounds-checked reads of fixed-width fields from a byte buffer.

/// A read that would extend past the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("read of {len} bytes at offset {offset} exceeds buffer of {available} bytes")]
pub struct OutOfBounds {
    pub offset: usize,
    pub len: usize,
    pub available: usize,
}

/// Read-only view over a buffer that turns out-of-range reads into errors.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn bytes_at(&self, offset: usize, len: usize) -> Result<&'a [u8], OutOfBounds> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(OutOfBounds {
                offset,
                len,
                available: self.data.len(),
            })
    }

    pub fn u8_at(&self, offset: usize) -> Result<u8, OutOfBounds> {
        self.bytes_at(offset, 1).map(|b| b[0])
    }

    pub fn u32_be_at(&self, offset: usize) -> Result<u32, OutOfBounds> {
        self.bytes_at(offset, 4)
            .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Whether the buffer begins with `prefix`. Shorter buffers never match.
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.bytes_at(0, prefix.len())
            .map(|head| head == prefix)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_big_endian_fields() {
        let data = [0x00, 0x00, 0x01, 0x00, 0xFF];
        let cursor = ByteCursor::new(&data);
        assert_eq!(cursor.u32_be_at(0).unwrap(), 256);
        assert_eq!(cursor.u8_at(4).unwrap(), 0xFF);
    }

    #[test]
    fn test_out_of_range_reads_are_errors() {
        let data = [1u8, 2, 3];
        let cursor = ByteCursor::new(&data);
        assert_eq!(
            cursor.u32_be_at(0),
            Err(OutOfBounds {
                offset: 0,
                len: 4,
                available: 3
            })
        );
        assert!(cursor.u8_at(3).is_err());
        assert!(cursor.bytes_at(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_starts_with_fails_closed_on_short_buffer() {
        let cursor = ByteCursor::new(b"%PD");
        assert!(!cursor.starts_with(b"%PDF-"));
        assert!(cursor.starts_with(b"%P"));
    }
}
