//! Canonical claim record produced by the extraction pipeline.
//!
//! Every optional field serializes as `null` when unknown, so a serialized
//! record always carries the full key set. Deserialization is tolerant of
//! loosely typed model output (see `lenient`).

use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::lenient;

/// A complete claim record for one uploaded document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Document header information.
    #[serde(default, deserialize_with = "lenient::object")]
    pub document: DocumentInfo,

    /// Insurance member the claim is filed under.
    #[serde(default, deserialize_with = "lenient::object")]
    pub member: Member,

    /// Treated patient.
    #[serde(default, deserialize_with = "lenient::object")]
    pub patient: Patient,

    /// Diagnoses, unique by (description, icd10).
    #[serde(default, deserialize_with = "lenient::list")]
    pub diagnoses: Vec<Diagnosis>,

    /// Medications dispensed or prescribed.
    #[serde(default, deserialize_with = "lenient::list")]
    pub medications: Vec<Medication>,

    /// Procedure names.
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub procedures: Vec<String>,

    /// Inpatient admission details.
    #[serde(default, deserialize_with = "lenient::object")]
    pub admission: Admission,

    /// Billed line items, unique by (code, description, qty, line_total).
    #[serde(default, deserialize_with = "lenient::list")]
    pub line_items: Vec<LineItem>,

    /// Invoice totals.
    #[serde(default, deserialize_with = "lenient::object")]
    pub totals: Totals,

    /// Display total as printed on the document. Distinct from
    /// `totals.invoice_amount`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub total_amount: Option<String>,
}

/// Document header fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// File name supplied by the caller. Never taken from document text.
    #[serde(default, deserialize_with = "lenient::required_string")]
    pub source_filename: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub invoice_number: Option<String>,

    /// Invoice date as `YYYY-MM-DD HH:MM:SS`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub invoice_date: Option<String>,

    /// Service provider.
    #[serde(default, deserialize_with = "lenient::string")]
    pub facility: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub insurer: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub scheme: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub claim_number: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub reference_no: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub card_or_referral_no: Option<String>,
}

impl DocumentInfo {
    /// Create an empty header for the given file.
    pub fn for_file(source_filename: impl Into<String>) -> Self {
        Self {
            source_filename: source_filename.into(),
            ..Self::default()
        }
    }
}

/// Insurance member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default, deserialize_with = "lenient::string")]
    pub member_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub member_number: Option<String>,
}

/// Patient demographics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::integer")]
    pub age: Option<i64>,
}

/// A diagnosis, optionally coded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnosis {
    pub description: String,

    /// ICD-10 code, e.g. `I10`.
    #[serde(default, deserialize_with = "lenient::string")]
    pub icd10: Option<String>,
}

impl Diagnosis {
    pub fn new(description: impl Into<String>, icd10: Option<String>) -> Self {
        Self {
            description: description.into(),
            icd10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub dosage: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub quantity: Option<String>,
}

/// Admission details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Admission {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub was_admitted: bool,

    #[serde(default, deserialize_with = "lenient::string")]
    pub admission_date: Option<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub discharge_date: Option<String>,
}

/// A billed line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Tariff or product code.
    #[serde(default, deserialize_with = "lenient::string")]
    pub code: Option<String>,

    pub description: String,

    #[serde(default, deserialize_with = "lenient::integer")]
    pub qty: Option<i64>,

    #[serde(default, deserialize_with = "lenient::amount")]
    pub unit_price: Option<f64>,

    #[serde(default, deserialize_with = "lenient::amount")]
    pub line_total: Option<f64>,

    /// Service timestamp for treatment rows (`YYYY-MM-DD - HH:MM:SS`).
    #[serde(default, deserialize_with = "lenient::string")]
    pub time: Option<String>,

    /// Treatment reference number.
    #[serde(default, deserialize_with = "lenient::string")]
    pub reference: Option<String>,
}

/// Invoice totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(default, deserialize_with = "lenient::amount")]
    pub net_amount: Option<f64>,

    #[serde(default, deserialize_with = "lenient::amount")]
    pub invoice_amount: Option<f64>,

    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_settlement: Option<f64>,

    /// Most recent running balance seen on the document.
    #[serde(default, deserialize_with = "lenient::amount")]
    pub balance: Option<f64>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub currency: Option<String>,

    /// `Net Value` exactly as printed, kept for audit.
    #[serde(default, deserialize_with = "lenient::string")]
    pub raw_net_value: Option<String>,
}

/// Identity of a list entry for deduplication.
pub trait DedupKey {
    type Key: Hash + Eq;

    fn dedup_key(&self) -> Self::Key;
}

impl DedupKey for Diagnosis {
    type Key = (String, Option<String>);

    fn dedup_key(&self) -> Self::Key {
        (self.description.clone(), self.icd10.clone())
    }
}

impl DedupKey for LineItem {
    type Key = (Option<String>, String, Option<i64>, Option<u64>);

    fn dedup_key(&self) -> Self::Key {
        (
            self.code.clone(),
            self.description.clone(),
            self.qty,
            self.line_total.map(float_bits),
        )
    }
}

// -0.0 and 0.0 compare equal as amounts
fn float_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

impl ClaimRecord {
    /// Create an empty record for the given file.
    pub fn for_file(source_filename: impl Into<String>) -> Self {
        Self {
            document: DocumentInfo::for_file(source_filename),
            ..Self::default()
        }
    }

    /// Check the record for gaps worth surfacing to a reviewer.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.document.invoice_number.is_none() && self.document.claim_number.is_none() {
            issues.push("Missing invoice and claim number".to_string());
        }

        if self.patient.name.is_none() && self.member.member_name.is_none() {
            issues.push("Missing patient and member name".to_string());
        }

        if self.diagnoses.is_empty() {
            issues.push("No diagnoses".to_string());
        }

        if self.line_items.is_empty() {
            issues.push("No line items".to_string());
        }

        if self.totals.invoice_amount.is_none() {
            issues.push("Missing invoice amount".to_string());
        }

        let line_sum: f64 = self.line_items.iter().filter_map(|i| i.line_total).sum();
        if let Some(invoice_amount) = self.totals.invoice_amount {
            if !self.line_items.is_empty() && (line_sum - invoice_amount).abs() > 0.01 {
                issues.push(format!(
                    "Line item total ({:.2}) differs from invoice amount ({:.2})",
                    line_sum, invoice_amount
                ));
            }
        }

        issues
    }
}
