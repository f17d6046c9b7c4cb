//! Tabular line item extraction for claim invoices.

use crate::models::claim::LineItem;

use super::amounts::normalize_amount;
use super::patterns::{CODED_LINE_ITEM, TREATMENT_LINE_ITEM};

/// Line items found in the text plus the last running balance seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineItemScan {
    pub items: Vec<LineItem>,
    /// Balance column of the last treatment row.
    pub last_balance: Option<f64>,
}

/// Extract coded rows first, then timestamped treatment rows.
pub fn extract_line_items(text: &str) -> LineItemScan {
    let mut scan = LineItemScan::default();

    for line in text.lines() {
        if let Some(item) = parse_coded_row(line.trim()) {
            scan.items.push(item);
        }
    }

    for line in text.lines() {
        if let Some((item, balance)) = parse_treatment_row(line.trim()) {
            scan.items.push(item);
            scan.last_balance = Some(balance);
        }
    }

    scan
}

/// `<code> <description> <qty> <unit price> <line total>`
fn parse_coded_row(line: &str) -> Option<LineItem> {
    let caps = CODED_LINE_ITEM.captures(line)?;
    let qty = caps[3].parse::<i64>().ok()?;

    Some(LineItem {
        code: Some(caps[1].to_string()),
        description: caps[2].trim().to_string(),
        qty: Some(qty),
        unit_price: Some(normalize_amount(&caps[4]).unwrap_or(0.0)),
        line_total: Some(normalize_amount(&caps[5]).unwrap_or(0.0)),
        time: None,
        reference: None,
    })
}

/// `<date> - <time> <description> <qty> <reference> <amount> <balance>`
fn parse_treatment_row(line: &str) -> Option<(LineItem, f64)> {
    let caps = TREATMENT_LINE_ITEM.captures(line)?;
    let qty = caps[4].parse::<i64>().ok()?;

    let item = LineItem {
        code: None,
        description: caps[3].trim().to_string(),
        qty: Some(qty),
        unit_price: None,
        line_total: Some(normalize_amount(&caps[6]).unwrap_or(0.0)),
        time: Some(format!("{} - {}", &caps[1], &caps[2])),
        reference: Some(caps[5].to_string()),
    };
    let balance = normalize_amount(&caps[7]).unwrap_or(0.0);

    Some((item, balance))
}
