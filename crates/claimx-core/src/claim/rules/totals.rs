//! Totals extraction for claim invoices.

use crate::models::claim::Totals;

use super::amounts::{format_amount, normalize_amount};
use super::patterns::{INVOICE_AMOUNT, NET_AMOUNT, NET_VALUE, TOTAL_AMOUNT, TOTAL_SETTLEMENT};

/// Labelled totals found in the text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TotalsScan {
    pub totals: Totals,
    /// `Total Amount:` rendered for display.
    pub total_amount: Option<String>,
}

/// Scan the totals labels, updating `totals` in place.
///
/// `totals` may already carry a balance from treatment rows; labels here
/// never touch it.
pub fn extract_totals(text: &str, totals: Totals) -> TotalsScan {
    let mut totals = totals;

    if let Some(caps) = NET_VALUE.captures(text) {
        let raw = caps[1].trim();
        let net = normalize_amount(raw).unwrap_or(0.0);
        totals.net_amount = Some(net);
        // Seeds the invoice amount; a later "Inv amt." replaces it.
        totals.invoice_amount = Some(net);
        totals.raw_net_value = Some(raw.to_string());
    }

    if let Some(caps) = INVOICE_AMOUNT.captures(text) {
        totals.invoice_amount = Some(normalize_amount(&caps[1]).unwrap_or(0.0));
    }

    if let Some(caps) = TOTAL_SETTLEMENT.captures(text) {
        totals.total_settlement = Some(normalize_amount(&caps[1]).unwrap_or(0.0));
    }

    // A zero or unreadable Net Amount keeps the Net Value figure.
    if let Some(caps) = NET_AMOUNT.captures(text) {
        if let Some(net) = normalize_amount(&caps[1]).filter(|v| *v != 0.0) {
            totals.net_amount = Some(net);
        }
    }

    let total_amount = TOTAL_AMOUNT
        .captures(text)
        .map(|caps| format_amount(normalize_amount(&caps[1]).unwrap_or(0.0)));

    TotalsScan {
        totals,
        total_amount,
    }
}
