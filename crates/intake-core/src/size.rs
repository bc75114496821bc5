//! Presentation helpers for byte sizes.

const KIB: f64 = 1024.0;
const MIB: usize = 1024 * 1024;

/// Format a byte count for display: KB below 1 MiB, MB otherwise, two decimals.
pub fn format_size(bytes: usize) -> String {
    if bytes < MIB {
        format!("{:.2} KB", bytes as f64 / KIB)
    } else {
        format!("{:.2} MB", bytes as f64 / MIB as f64)
    }
}
