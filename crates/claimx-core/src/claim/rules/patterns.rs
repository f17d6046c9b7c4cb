//! Common regex patterns for claim invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Labelled header fields. Values stay on the label's line.
    pub static ref INVOICE_NUMBER_LABEL: Regex = Regex::new(
        r"(?i)INVOICE\s*NUMBER\s*:[ \t]*(.+)"
    ).unwrap();

    pub static ref INVOICE_NO_LABEL: Regex = Regex::new(
        r"(?i)Invoice\s*No\s*:[ \t]*(.+)"
    ).unwrap();

    pub static ref INVOICE_DATE_LABEL: Regex = Regex::new(
        r"(?i)INVOICE\s*DATE\s*:[ \t]*([0-9:\- \t]+)"
    ).unwrap();

    pub static ref SERVICE_PROVIDER_LABEL: Regex = Regex::new(
        r"(?i)SERVICE\s*PROVIDER\s*:[ \t]*(.+)"
    ).unwrap();

    pub static ref INSURER_LABEL: Regex = Regex::new(
        r"(?i)Insurer\s*Name\s*:[ \t]*(.+)"
    ).unwrap();

    pub static ref SCHEME_LABEL: Regex = Regex::new(
        r"(?i)Scheme\s*Name\s*:[ \t]*(.+)"
    ).unwrap();

    pub static ref CLAIM_NUMBER_LABEL: Regex = Regex::new(
        r"(?i)Claim\s*Number\s*:[ \t]*(.+)"
    ).unwrap();

    pub static ref REFERENCE_NO_LABEL: Regex = Regex::new(
        r"(?i)Reference\s*No\s*:[ \t]*(.+)"
    ).unwrap();

    pub static ref CARD_NO_LABEL: Regex = Regex::new(
        r"(?i)(?:Card/Referral|Card)\s*No\s*:[ \t]*(.+)"
    ).unwrap();

    pub static ref MEMBER_NAME_LABEL: Regex = Regex::new(
        r"(?i)MEMBER\s*NAME\s*:[ \t]*(.+)"
    ).unwrap();

    pub static ref MEMBER_NUMBER_LABEL: Regex = Regex::new(
        r"(?i)MEMBER\s*NUMBER\s*:[ \t]*(.+)"
    ).unwrap();

    pub static ref PATIENT_NAME_LABEL: Regex = Regex::new(
        r"(?i)Patient\s*Name\s*:[ \t]*(.+)"
    ).unwrap();

    // Diagnoses
    pub static ref DIAGNOSIS_LABEL: Regex = Regex::new(
        r"(?im)^[ \t]*DIAGNOSIS\s*:[ \t]*(.+)$"
    ).unwrap();

    /// "Hypertension I10": description followed by an ICD-10 style token.
    pub static ref CODED_DIAGNOSIS: Regex = Regex::new(
        r"^([A-Za-z0-9 \-/()]+)\s+([A-Z][0-9A-Z]{2,4})$"
    ).unwrap();

    // Line items
    /// "13119033 DOXYCYCLINE 100MG TABLETS 1 3000 3000.0"
    pub static ref CODED_LINE_ITEM: Regex = Regex::new(
        r"^(\d{5,})\s+(.+?)\s+(\d+)\s+([\d,]+(?:\.\d+)?)\s+([\d,]+(?:\.\d+)?)$"
    ).unwrap();

    /// "2025-06-17 - 09:12:30 MRI Scan 1 3952841 17,500.00 17,500.00"
    pub static ref TREATMENT_LINE_ITEM: Regex = Regex::new(
        r"^(\d{4}-\d{2}-\d{2})\s*-\s*(\d{2}:\d{2}:\d{2})\s+(.+?)\s+(\d+)\s+(\d+)\s+([\d,]+\.\d{2})\s+([\d,]+\.\d{2})$"
    ).unwrap();

    // Totals
    pub static ref NET_VALUE: Regex = Regex::new(
        r"(?i)Net\s*Value\s*:\s*([\d,₦]+(?:\.\d+)?)"
    ).unwrap();

    pub static ref INVOICE_AMOUNT: Regex = Regex::new(
        r"(?i)Inv(?:oice)?\s*amt\.\s*:?\s*([\d,₦]+\.\d{2})"
    ).unwrap();

    pub static ref TOTAL_SETTLEMENT: Regex = Regex::new(
        r"(?i)Total\s*Settlement\s*:?\s*([\d,₦]+\.\d{2})"
    ).unwrap();

    pub static ref NET_AMOUNT: Regex = Regex::new(
        r"(?i)Net\s*Amount\s*:?\s*([\d,₦]+\.\d{2})"
    ).unwrap();

    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)Total\s*Amount\s*:\s*([\d,₦]+(?:\.\d+)?)"
    ).unwrap();

    // Model output
    /// A fenced block anywhere in the response; the language tag is optional.
    pub static ref FENCED_BLOCK: Regex = Regex::new(
        r"(?is)```(?:json)?[ \t]*\r?\n?(.*?)```"
    ).unwrap();

    pub static ref OPENING_FENCE: Regex = Regex::new(
        r"(?i)^```(?:json)?\s*"
    ).unwrap();
}

/// Condition keywords that make a coded line a plausible diagnosis.
pub const CONDITION_KEYWORDS: &[&str] = &[
    "hypertension",
    "diabetes",
    "bronchitis",
    "asthma",
    "malaria",
    "dermatitis",
    "fever",
    "infection",
    "pneumonia",
    "arthritis",
];
