//! Amount normalization for claim invoices.

/// Characters dropped before parsing: currency symbols and thousands separators.
const STRIPPED: &[char] = &['₦', '$', '£', '€', ','];

/// Parse a loosely formatted amount (e.g. `"₦15,000.50"`) into a number.
///
/// Currency symbols, thousands separators and whitespace are removed; any
/// other residue makes the value unreadable and yields `None`.
pub fn normalize_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| !STRIPPED.contains(c) && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format an amount with two decimals for display totals.
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_amount() {
        assert_eq!(normalize_amount("₦15,000.50"), Some(15000.50));
        assert_eq!(normalize_amount("1,234.56"), Some(1234.56));
        assert_eq!(normalize_amount(" $ 3000 "), Some(3000.0));
        assert_eq!(normalize_amount("€12"), Some(12.0));
        assert_eq!(normalize_amount("22800"), Some(22800.0));
    }

    #[test]
    fn test_normalize_rejects_residue() {
        assert_eq!(normalize_amount("not a number"), None);
        assert_eq!(normalize_amount(""), None);
        assert_eq!(normalize_amount("₦"), None);
        assert_eq!(normalize_amount("12 kg"), None);
        assert_eq!(normalize_amount("inf"), None);
        assert_eq!(normalize_amount("NaN"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(49000.0), "49000.00");
        assert_eq!(format_amount(22800.5), "22800.50");
    }
}
