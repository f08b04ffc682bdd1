//! Human-readable byte sizes for the per-item result report.

/// Format a byte count with 1024-based units and up to two decimals.
///
/// Trailing zeros are trimmed: `format_bytes(1536)` is `"1.5 KB"`, not
/// `"1.50 KB"`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exp = (bytes.ilog2() / 10).min(UNITS.len() as u32 - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{text} {}", UNITS[exp as usize])
}

/// Size change of a converted item relative to its original, as a percentage
/// string (`"-33%"` for smaller, `"+12%"` for larger). `None` when there is
/// no change or no original size to compare against.
pub fn size_delta(original: u64, converted: u64) -> Option<String> {
    if original == 0 {
        return None;
    }
    let reduction = 100.0 - (converted as f64 / original as f64) * 100.0;
    let rounded = reduction.round() as i64;
    match rounded {
        0 => None,
        r if r > 0 => Some(format!("-{r}%")),
        r => Some(format!("+{}%", -r)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_zero() {
        assert_eq!(format_bytes(0), "0 Bytes");
    }

    #[test]
    fn test_format_bytes_small() {
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1023), "1023 Bytes");
    }

    #[test]
    fn test_format_bytes_units() {
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1024 * 1024), "1 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5 GB");
    }

    #[test]
    fn test_format_bytes_decimals_trimmed() {
        // 1100 / 1024 = 1.07421875 -> "1.07 KB"
        assert_eq!(format_bytes(1100), "1.07 KB");
        // 2560 / 1024 = 2.5 -> "2.5 KB" (no trailing zero)
        assert_eq!(format_bytes(2560), "2.5 KB");
    }

    #[test]
    fn test_size_delta() {
        assert_eq!(size_delta(1000, 500), Some("-50%".to_string()));
        assert_eq!(size_delta(1000, 1120), Some("+12%".to_string()));
        assert_eq!(size_delta(1000, 1000), None);
        assert_eq!(size_delta(0, 500), None);
    }
}
