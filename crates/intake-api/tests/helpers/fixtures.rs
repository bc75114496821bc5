//! Test fixtures: PNG/PDF blobs.

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// PNG with an IHDR header for `width`x`height` RGB pixels and an IDAT chunk
/// padding the file out to at least `min_len` bytes.
pub fn create_test_png(width: u32, height: u32, min_len: usize) -> Vec<u8> {
    let mut png = PNG_SIGNATURE.to_vec();
    png.extend_from_slice(&13u32.to_be_bytes());
    png.extend_from_slice(b"IHDR");
    png.extend_from_slice(&width.to_be_bytes());
    png.extend_from_slice(&height.to_be_bytes());
    png.extend_from_slice(&[8, 2, 0, 0, 0]);
    png.extend_from_slice(&[0x90, 0x77, 0x53, 0xDE]);

    let idat_len = min_len.saturating_sub(png.len() + 24).max(1);
    png.extend_from_slice(&(idat_len as u32).to_be_bytes());
    png.extend_from_slice(b"IDAT");
    png.extend(std::iter::repeat(0x78u8).take(idat_len));
    png.extend_from_slice(&[0, 0, 0, 0]);
    png.extend_from_slice(&0u32.to_be_bytes());
    png.extend_from_slice(b"IEND");
    png.extend_from_slice(&0xAE426082u32.to_be_bytes());
    png
}

/// RGBA PNG (color type 6) of at least `min_len` bytes.
pub fn create_rgba_png(min_len: usize) -> Vec<u8> {
    let mut png = create_test_png(16, 16, min_len);
    png[25] = 6;
    png
}

/// Minimal well-formed PDF.
pub fn create_test_pdf() -> Vec<u8> {
    b"%PDF-1.4
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj
2 0 obj
<< /Type /Pages /Kids [3 0 R] /Count 1 >>
endobj
3 0 obj
<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>
endobj
xref
0 4
0000000000 65535 f 
0000000009 00000 n 
0000000058 00000 n 
0000000115 00000 n 
trailer
<< /Size 4 /Root 1 0 R >>
startxref
178
%%EOF
"
    .to_vec()
}
