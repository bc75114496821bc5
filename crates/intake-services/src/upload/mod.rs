//! Upload orchestration, one service per accepted format.
//!
//! Both pipelines run ingest → signature → structure and then store the
//! record. Documents additionally pass through the malware scan and hold the
//! store's single in-flight slot for the whole pipeline.

pub mod document;
pub mod image;

pub use document::DocumentUploadService;
pub use image::ImageUploadService;

#[cfg(test)]
pub(crate) mod test_support {
    use bytes::Bytes;
    use futures::stream::{self, Stream};
    use intake_processing::signature::PNG_SIGNATURE;
    use std::io;

    /// A PNG with a complete IHDR header padded out to `total_len` bytes.
    pub fn png_bytes(total_len: usize) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&64u32.to_be_bytes());
        data.extend_from_slice(&48u32.to_be_bytes());
        data.extend_from_slice(&[8, 2, 0, 0, 0]);
        data.resize(total_len, 0x11);
        data
    }

    pub fn pdf_bytes() -> Vec<u8> {
        b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n\
2 0 obj\n<< /Type /Pages /Kids [] /Count 0 >>\nendobj\n\
xref\n0 3\n0000000000 65535 f \n0000000009 00000 n \n0000000058 00000 n \n\
trailer\n<< /Size 3 /Root 1 0 R >>\nstartxref\n110\n%%EOF\n"
            .to_vec()
    }

    /// Split `data` into a stream of `chunk_size` byte chunks.
    pub fn body(data: Vec<u8>, chunk_size: usize) -> impl Stream<Item = Result<Bytes, io::Error>> {
        let chunks: Vec<Result<Bytes, io::Error>> = data
            .chunks(chunk_size.max(1))
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        stream::iter(chunks)
    }

    pub fn empty_body() -> impl Stream<Item = Result<Bytes, io::Error>> {
        stream::iter(Vec::<Result<Bytes, io::Error>>::new())
    }
}
