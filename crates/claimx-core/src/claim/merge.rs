//! Reconciliation of the pattern and model records.
//!
//! The model record is the base. Critical scalar fields it left blank are
//! filled from the pattern record, and pattern list entries with a novel
//! dedup key are appended. Nothing the model supplied is altered or removed.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::models::claim::{ClaimRecord, DedupKey};

/// Scalar field eligible for fill from the pattern record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriticalField {
    InvoiceNumber,
    InvoiceDate,
    Facility,
    Insurer,
    Scheme,
    ClaimNumber,
    ReferenceNo,
    CardOrReferralNo,
    MemberName,
    MemberNumber,
    PatientName,
    InvoiceAmount,
    NetAmount,
    TotalSettlement,
    Balance,
    RawNetValue,
    TotalAmount,
}

impl CriticalField {
    /// Every critical field, in fill order.
    pub const ALL: [CriticalField; 17] = [
        CriticalField::InvoiceNumber,
        CriticalField::InvoiceDate,
        CriticalField::Facility,
        CriticalField::Insurer,
        CriticalField::Scheme,
        CriticalField::ClaimNumber,
        CriticalField::ReferenceNo,
        CriticalField::CardOrReferralNo,
        CriticalField::MemberName,
        CriticalField::MemberNumber,
        CriticalField::PatientName,
        CriticalField::InvoiceAmount,
        CriticalField::NetAmount,
        CriticalField::TotalSettlement,
        CriticalField::Balance,
        CriticalField::RawNetValue,
        CriticalField::TotalAmount,
    ];

    /// Dotted path of the field in the canonical record.
    pub fn path(&self) -> &'static str {
        match self {
            CriticalField::InvoiceNumber => "document.invoice_number",
            CriticalField::InvoiceDate => "document.invoice_date",
            CriticalField::Facility => "document.facility",
            CriticalField::Insurer => "document.insurer",
            CriticalField::Scheme => "document.scheme",
            CriticalField::ClaimNumber => "document.claim_number",
            CriticalField::ReferenceNo => "document.reference_no",
            CriticalField::CardOrReferralNo => "document.card_or_referral_no",
            CriticalField::MemberName => "member.member_name",
            CriticalField::MemberNumber => "member.member_number",
            CriticalField::PatientName => "patient.name",
            CriticalField::InvoiceAmount => "totals.invoice_amount",
            CriticalField::NetAmount => "totals.net_amount",
            CriticalField::TotalSettlement => "totals.total_settlement",
            CriticalField::Balance => "totals.balance",
            CriticalField::RawNetValue => "totals.raw_net_value",
            CriticalField::TotalAmount => "total_amount",
        }
    }

    /// Copy the pattern value into `llm` when the model left the field blank.
    /// Returns whether a value was copied.
    fn fill(&self, pre: &ClaimRecord, llm: &mut ClaimRecord) -> bool {
        match self {
            CriticalField::InvoiceNumber => {
                fill_slot(&pre.document.invoice_number, &mut llm.document.invoice_number)
            }
            CriticalField::InvoiceDate => {
                fill_slot(&pre.document.invoice_date, &mut llm.document.invoice_date)
            }
            CriticalField::Facility => {
                fill_slot(&pre.document.facility, &mut llm.document.facility)
            }
            CriticalField::Insurer => fill_slot(&pre.document.insurer, &mut llm.document.insurer),
            CriticalField::Scheme => fill_slot(&pre.document.scheme, &mut llm.document.scheme),
            CriticalField::ClaimNumber => {
                fill_slot(&pre.document.claim_number, &mut llm.document.claim_number)
            }
            CriticalField::ReferenceNo => {
                fill_slot(&pre.document.reference_no, &mut llm.document.reference_no)
            }
            CriticalField::CardOrReferralNo => fill_slot(
                &pre.document.card_or_referral_no,
                &mut llm.document.card_or_referral_no,
            ),
            CriticalField::MemberName => {
                fill_slot(&pre.member.member_name, &mut llm.member.member_name)
            }
            CriticalField::MemberNumber => {
                fill_slot(&pre.member.member_number, &mut llm.member.member_number)
            }
            CriticalField::PatientName => fill_slot(&pre.patient.name, &mut llm.patient.name),
            CriticalField::InvoiceAmount => {
                fill_slot(&pre.totals.invoice_amount, &mut llm.totals.invoice_amount)
            }
            CriticalField::NetAmount => {
                fill_slot(&pre.totals.net_amount, &mut llm.totals.net_amount)
            }
            CriticalField::TotalSettlement => {
                fill_slot(&pre.totals.total_settlement, &mut llm.totals.total_settlement)
            }
            CriticalField::Balance => fill_slot(&pre.totals.balance, &mut llm.totals.balance),
            CriticalField::RawNetValue => {
                fill_slot(&pre.totals.raw_net_value, &mut llm.totals.raw_net_value)
            }
            CriticalField::TotalAmount => fill_slot(&pre.total_amount, &mut llm.total_amount),
        }
    }
}

impl fmt::Display for CriticalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// What a merge changed in the model record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    /// Critical fields filled from the pattern record.
    pub filled: Vec<CriticalField>,
    pub diagnoses_added: usize,
    pub line_items_added: usize,
}

impl MergeReport {
    /// True when the model record came through untouched.
    pub fn is_empty(&self) -> bool {
        self.filled.is_empty() && self.diagnoses_added == 0 && self.line_items_added == 0
    }
}

/// A value the model may have left blank.
trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for Option<String> {
    fn is_blank(&self) -> bool {
        self.as_deref().is_none_or(|s| s.trim().is_empty())
    }
}

impl Blank for Option<f64> {
    fn is_blank(&self) -> bool {
        (*self).is_none_or(|v| v == 0.0)
    }
}

fn fill_slot<T>(pre: &Option<T>, llm: &mut Option<T>) -> bool
where
    T: Clone,
    Option<T>: Blank,
{
    if llm.is_blank() && pre.is_some() {
        *llm = pre.clone();
        true
    } else {
        false
    }
}

/// Append entries of `extra` whose key is not yet in `items`, keeping order.
fn append_missing<T>(items: &mut Vec<T>, extra: &[T]) -> usize
where
    T: DedupKey + Clone,
{
    let mut seen: HashSet<T::Key> = items.iter().map(DedupKey::dedup_key).collect();
    let before = items.len();

    for entry in extra {
        if seen.insert(entry.dedup_key()) {
            items.push(entry.clone());
        }
    }

    items.len() - before
}

/// Drop repeated entries, keeping the first of each key. Returns how many
/// were dropped.
pub(crate) fn dedup_in_place<T: DedupKey>(items: &mut Vec<T>) -> usize {
    let mut seen = HashSet::new();
    let before = items.len();
    items.retain(|entry| seen.insert(entry.dedup_key()));
    before - items.len()
}

/// Merge the pattern record `pre` into the model record `llm` in place.
pub fn merge_into(pre: &ClaimRecord, llm: &mut ClaimRecord) -> MergeReport {
    let mut report = MergeReport::default();

    for field in CriticalField::ALL {
        if field.fill(pre, llm) {
            debug!("Filled {} from pattern record", field);
            report.filled.push(field);
        }
    }

    report.diagnoses_added = append_missing(&mut llm.diagnoses, &pre.diagnoses);
    report.line_items_added = append_missing(&mut llm.line_items, &pre.line_items);

    report
}

/// Merge the pattern record `pre` into the model record `llm`.
pub fn merge(pre: &ClaimRecord, mut llm: ClaimRecord) -> ClaimRecord {
    merge_into(pre, &mut llm);
    llm
}
