//! Rule-based claim extractor.

use tracing::{debug, info};

use crate::error::Result;
use crate::models::claim::ClaimRecord;

use super::rules::{extract_diagnoses, extract_fields, extract_line_items, extract_totals};
use super::{ClaimExtractor, ExtractionSource, PartialClaim};

/// Deterministic extractor over cleaned OCR text.
///
/// Never fails: text that matches no rule yields a sparse record carrying
/// only the caller's file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Scan `text` and build a partial record for `source_filename`.
    pub fn parse(&self, text: &str, source_filename: &str) -> ClaimRecord {
        let mut record = ClaimRecord::for_file(source_filename);

        let fields = extract_fields(text);
        for (field, found) in fields {
            debug!("{} <- {:?}", field.path(), found.source);
            field.assign(&mut record, found.value);
        }

        record.diagnoses = extract_diagnoses(text);

        let scan = extract_line_items(text);
        record.line_items = scan.items;
        record.totals.balance = scan.last_balance;

        let totals = extract_totals(text, std::mem::take(&mut record.totals));
        record.totals = totals.totals;
        record.total_amount = totals.total_amount;

        info!(
            "Pattern pass on {}: {} diagnoses, {} line items",
            source_filename,
            record.diagnoses.len(),
            record.line_items.len()
        );

        record
    }
}

impl ClaimExtractor for PatternExtractor {
    fn source(&self) -> ExtractionSource {
        ExtractionSource::Pattern
    }

    fn extract(&self, input: &str, source_filename: &str) -> Result<PartialClaim> {
        Ok(PartialClaim::new(
            self.source(),
            self.parse(input, source_filename),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::claim::{Diagnosis, LineItem};
    use pretty_assertions::assert_eq;

    const OUTPATIENT_INVOICE: &str = "INVOICE NUMBER: 10002
MEMBER NAME: Emily Davis
MEMBER NUMBER: UU223344-06
INVOICE DATE: 2024-11-01
SERVICE PROVIDER: LIFELINK MEDICAL CENTER
Insurer Name: HEALTHGUARD INSURANCE
Scheme Name: CORPORATE GOLD
Patient Name: Emily Davis
DIAGNOSIS: Dermatitis
13119033 DOXYCYCLINE 100MG TABLETS 1 3000 3000.0
20045001 CONSULTATION GENERAL PRACTITIONER 1 19800 19800.0
Net Value: 22,800.0
Total Amount: 22,800.00";

    #[test]
    fn test_doxycycline_line() {
        let record = PatternExtractor::new()
            .parse("13119033 DOXYCYCLINE 100MG TABLETS 1 3000 3000.0", "scan.png");

        assert_eq!(
            record.line_items,
            vec![LineItem {
                code: Some("13119033".into()),
                description: "DOXYCYCLINE 100MG TABLETS".into(),
                qty: Some(1),
                unit_price: Some(3000.0),
                line_total: Some(3000.0),
                time: None,
                reference: None,
            }]
        );
    }

    #[test]
    fn test_outpatient_invoice() {
        let record = PatternExtractor::new().parse(OUTPATIENT_INVOICE, "emily.pdf");

        assert_eq!(record.document.source_filename, "emily.pdf");
        assert_eq!(record.document.invoice_number.as_deref(), Some("10002"));
        assert_eq!(
            record.document.invoice_date.as_deref(),
            Some("2024-11-01 00:00:00")
        );
        assert_eq!(
            record.document.facility.as_deref(),
            Some("LIFELINK MEDICAL CENTER")
        );
        assert_eq!(record.document.scheme.as_deref(), Some("CORPORATE GOLD"));
        assert_eq!(record.member.member_number.as_deref(), Some("UU223344-06"));
        assert_eq!(record.patient.name.as_deref(), Some("Emily Davis"));
        assert_eq!(record.diagnoses, vec![Diagnosis::new("Dermatitis", None)]);
        assert_eq!(record.line_items.len(), 2);
        assert_eq!(record.totals.net_amount, Some(22800.0));
        assert_eq!(record.totals.invoice_amount, Some(22800.0));
        assert_eq!(record.totals.raw_net_value.as_deref(), Some("22,800.0"));
        assert_eq!(record.total_amount.as_deref(), Some("22800.00"));
    }

    #[test]
    fn test_treatment_balance_reaches_totals() {
        let text = "Patient Name: Miriam Njeri
2025-06-17 - 09:12:30 MRI Scan 1 3952841 17,500.00 17,500.00
2025-06-17 - 10:40:00 Consultation 1 3952842 5,300.00 22,800.00
Inv amt. 22,800.00";

        let record = PatternExtractor::new().parse(text, "miriam.pdf");

        assert_eq!(record.line_items.len(), 2);
        assert_eq!(record.totals.balance, Some(22800.0));
        assert_eq!(record.totals.invoice_amount, Some(22800.0));
    }

    #[test]
    fn test_text_without_matches_is_sparse() {
        let partial = PatternExtractor::new()
            .extract("nothing to see here", "blank.pdf")
            .unwrap();

        assert_eq!(partial.source, ExtractionSource::Pattern);
        assert_eq!(partial.record, ClaimRecord::for_file("blank.pdf"));
    }
}
