//! Labelled header fields (`Label: value`) for claim invoices.
//!
//! Rules form an explicit priority table keyed by destination field. For each
//! destination the highest-priority matching rule wins; a rule contributes only
//! its first match in the text.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use super::dates::normalize_invoice_date;
use super::patterns::*;
use super::ExtractionMatch;
use crate::models::claim::ClaimRecord;

/// Destination of a labelled header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClaimField {
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
}

impl ClaimField {
    /// Dotted path of the field in the canonical record.
    pub fn path(&self) -> &'static str {
        match self {
            ClaimField::InvoiceNumber => "document.invoice_number",
            ClaimField::InvoiceDate => "document.invoice_date",
            ClaimField::Facility => "document.facility",
            ClaimField::Insurer => "document.insurer",
            ClaimField::Scheme => "document.scheme",
            ClaimField::ClaimNumber => "document.claim_number",
            ClaimField::ReferenceNo => "document.reference_no",
            ClaimField::CardOrReferralNo => "document.card_or_referral_no",
            ClaimField::MemberName => "member.member_name",
            ClaimField::MemberNumber => "member.member_number",
            ClaimField::PatientName => "patient.name",
        }
    }

    /// Write a captured value into the record.
    pub fn assign(&self, record: &mut ClaimRecord, value: String) {
        let slot = match self {
            ClaimField::InvoiceNumber => &mut record.document.invoice_number,
            ClaimField::InvoiceDate => &mut record.document.invoice_date,
            ClaimField::Facility => &mut record.document.facility,
            ClaimField::Insurer => &mut record.document.insurer,
            ClaimField::Scheme => &mut record.document.scheme,
            ClaimField::ClaimNumber => &mut record.document.claim_number,
            ClaimField::ReferenceNo => &mut record.document.reference_no,
            ClaimField::CardOrReferralNo => &mut record.document.card_or_referral_no,
            ClaimField::MemberName => &mut record.member.member_name,
            ClaimField::MemberNumber => &mut record.member.member_number,
            ClaimField::PatientName => &mut record.patient.name,
        };
        *slot = Some(value);
    }
}

/// One row of the priority table.
pub struct FieldRule {
    pub field: ClaimField,
    /// Higher wins when several rules match the same field.
    pub priority: u8,
    pub pattern: &'static Regex,
}

lazy_static! {
    pub static ref FIELD_RULES: Vec<FieldRule> = vec![
        FieldRule { field: ClaimField::InvoiceNumber, priority: 1, pattern: &*INVOICE_NUMBER_LABEL },
        // "Invoice No:" is the more specific label and outranks "INVOICE NUMBER:".
        FieldRule { field: ClaimField::InvoiceNumber, priority: 2, pattern: &*INVOICE_NO_LABEL },
        FieldRule { field: ClaimField::InvoiceDate, priority: 1, pattern: &*INVOICE_DATE_LABEL },
        FieldRule { field: ClaimField::Facility, priority: 1, pattern: &*SERVICE_PROVIDER_LABEL },
        FieldRule { field: ClaimField::Insurer, priority: 1, pattern: &*INSURER_LABEL },
        FieldRule { field: ClaimField::Scheme, priority: 1, pattern: &*SCHEME_LABEL },
        FieldRule { field: ClaimField::ClaimNumber, priority: 1, pattern: &*CLAIM_NUMBER_LABEL },
        FieldRule { field: ClaimField::ReferenceNo, priority: 1, pattern: &*REFERENCE_NO_LABEL },
        FieldRule { field: ClaimField::CardOrReferralNo, priority: 1, pattern: &*CARD_NO_LABEL },
        FieldRule { field: ClaimField::MemberName, priority: 1, pattern: &*MEMBER_NAME_LABEL },
        FieldRule { field: ClaimField::MemberNumber, priority: 1, pattern: &*MEMBER_NUMBER_LABEL },
        FieldRule { field: ClaimField::PatientName, priority: 1, pattern: &*PATIENT_NAME_LABEL },
    ];
}

/// Extract labelled header values, resolving overlaps by rule priority.
pub fn extract_fields(text: &str) -> BTreeMap<ClaimField, ExtractionMatch<String>> {
    let mut winners: BTreeMap<ClaimField, (u8, ExtractionMatch<String>)> = BTreeMap::new();

    for rule in FIELD_RULES.iter() {
        let Some(caps) = rule.pattern.captures(text) else {
            continue;
        };
        let (Some(whole), Some(value)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        let mut value = value.as_str().trim().to_string();
        if value.is_empty() {
            continue;
        }
        if rule.field == ClaimField::InvoiceDate {
            value = normalize_invoice_date(&value);
        }

        let candidate =
            ExtractionMatch::new(value, whole.as_str()).with_position(whole.start(), whole.end());

        let replace = match winners.get(&rule.field) {
            None => true,
            Some((priority, current)) => {
                rule.priority > *priority
                    || (rule.priority == *priority && candidate.position < current.position)
            }
        };
        if replace {
            winners.insert(rule.field, (rule.priority, candidate));
        }
    }

    winners.into_iter().map(|(field, (_, m))| (field, m)).collect()
}
