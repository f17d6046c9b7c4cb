//! Claim extraction module.
//!
//! Two extractors read the same document independently and produce the same
//! partial record shape; [`merge`] reconciles them into the canonical record.

mod adapter;
pub mod merge;
mod parser;
pub mod rules;
pub mod text;

pub use adapter::ModelOutputAdapter;
pub use parser::PatternExtractor;

use crate::error::Result;
use crate::models::claim::ClaimRecord;

/// Which extractor produced a partial record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Deterministic rules over the document text.
    Pattern,
    /// Repaired output of the hosted model.
    Model,
}

/// A record produced by a single extractor, before reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialClaim {
    pub source: ExtractionSource,
    pub record: ClaimRecord,
}

impl PartialClaim {
    pub fn new(source: ExtractionSource, record: ClaimRecord) -> Self {
        Self { source, record }
    }
}

/// Trait for claim extractors.
pub trait ClaimExtractor {
    /// Which extractor this is.
    fn source(&self) -> ExtractionSource;

    /// Build a partial record from `input` for the file `source_filename`.
    fn extract(&self, input: &str, source_filename: &str) -> Result<PartialClaim>;
}
