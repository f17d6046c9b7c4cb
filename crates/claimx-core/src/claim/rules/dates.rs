//! Date normalization for claim invoices.

use chrono::{NaiveDate, NaiveDateTime};

const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Normalize an invoice date to `YYYY-MM-DD HH:MM:SS`.
///
/// A bare date gets a zero time of day. Values that are not ISO dates are
/// returned trimmed but otherwise unchanged.
pub fn normalize_invoice_date(s: &str) -> String {
    let s = s.trim();

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return dt.format(OUTPUT_FORMAT).to_string();
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return format!("{} 00:00:00", date.format("%Y-%m-%d"));
    }

    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_date_gets_midnight() {
        assert_eq!(normalize_invoice_date("2025-06-17"), "2025-06-17 00:00:00");
    }

    #[test]
    fn test_datetime_kept() {
        assert_eq!(
            normalize_invoice_date("2024-11-01 00:00:00"),
            "2024-11-01 00:00:00"
        );
        assert_eq!(
            normalize_invoice_date("2024-11-01T08:30:00"),
            "2024-11-01 08:30:00"
        );
        assert_eq!(
            normalize_invoice_date(" 2024-11-01 08:30 "),
            "2024-11-01 08:30:00"
        );
    }

    #[test]
    fn test_unrecognized_verbatim() {
        assert_eq!(normalize_invoice_date("17/06/2025"), "17/06/2025");
        assert_eq!(normalize_invoice_date("2025-13-40"), "2025-13-40");
    }
}
