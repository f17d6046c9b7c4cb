//! Rule-based field extractors for medical claim invoices.

pub mod amounts;
pub mod dates;
pub mod diagnoses;
pub mod fields;
pub mod line_items;
pub mod patterns;
pub mod totals;

pub use amounts::normalize_amount;
pub use dates::normalize_invoice_date;
pub use diagnoses::extract_diagnoses;
pub use fields::{extract_fields, ClaimField};
pub use line_items::{extract_line_items, LineItemScan};
pub use totals::{extract_totals, TotalsScan};

/// A value matched in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span of the whole match in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
