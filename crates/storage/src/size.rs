/// Decimal unit suffixes after bytes.
const UNITS: &[&str] = &["kB", "MB", "GB", "TB", "PB", "EB"];

/// Formats a byte count with decimal units and one decimal place:
/// `1 Byte`, `512 Bytes`, `1.0 kB`, `2.5 GB`.
pub fn format_size(bytes: u64) -> String {
    match bytes {
        1 => return "1 Byte".into(),
        0..1000 => return format!("{bytes} Bytes"),
        _ => {}
    }

    let mut value = bytes as f64 / 1000.0;
    let mut unit = 0;
    while value >= 1000.0 && unit + 1 < UNITS.len() {
        value /= 1000.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(1), "1 Byte");
        assert_eq!(format_size(999), "999 Bytes");
    }

    #[test]
    fn decimal_units() {
        assert_eq!(format_size(1000), "1.0 kB");
        assert_eq!(format_size(1500), "1.5 kB");
        assert_eq!(format_size(2_500_000), "2.5 MB");
        assert_eq!(format_size(12_938_219_383), "12.9 GB");
        assert_eq!(format_size(1_000_000_000_000), "1.0 TB");
    }

    #[test]
    fn unit_changes_at_raw_boundary() {
        assert_eq!(format_size(999_999), "1000.0 kB");
        assert_eq!(format_size(1_000_000), "1.0 MB");
        assert_eq!(format_size(999_999_999), "1000.0 MB");
    }

    #[test]
    fn largest_unit_caps() {
        assert_eq!(format_size(u64::MAX), "18.4 EB");
    }
}
