//! Repair of hosted-model output into the canonical claim record.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ClaimsError, Result};
use crate::models::claim::ClaimRecord;

use super::merge::dedup_in_place;
use super::rules::normalize_invoice_date;
use super::rules::patterns::{FENCED_BLOCK, OPENING_FENCE};
use super::{ClaimExtractor, ExtractionSource, PartialClaim};

/// Reads the model's JSON answer into a schema-complete record.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelOutputAdapter;

impl ModelOutputAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Parse the raw model response for `source_filename`.
    ///
    /// Fails with [`ClaimsError::MalformedModelOutput`] when the response is
    /// not a JSON object once code fences are removed.
    pub fn parse(&self, raw: &str, source_filename: &str) -> Result<ClaimRecord> {
        let body = strip_code_fence(raw);

        let value: Value = serde_json::from_str(body).map_err(|e| {
            warn!("Model output is not valid JSON: {}", e);
            ClaimsError::MalformedModelOutput(e.to_string())
        })?;

        if !value.is_object() {
            return Err(ClaimsError::MalformedModelOutput(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }

        let mut record: ClaimRecord = serde_json::from_value(value)
            .map_err(|e| ClaimsError::MalformedModelOutput(e.to_string()))?;

        // The model never decides which file it read.
        record.document.source_filename = source_filename.to_string();

        if let Some(date) = record.document.invoice_date.take() {
            record.document.invoice_date = Some(normalize_invoice_date(&date));
        }

        record.diagnoses.retain_mut(|d| {
            d.description = d.description.trim().to_string();
            !d.description.is_empty()
        });
        record.line_items.retain_mut(|i| {
            i.description = i.description.trim().to_string();
            !i.description.is_empty()
        });

        let diagnoses = dedup_in_place(&mut record.diagnoses);
        let line_items = dedup_in_place(&mut record.line_items);
        if diagnoses + line_items > 0 {
            debug!(
                "Dropped {} duplicate diagnoses and {} duplicate line items from model output",
                diagnoses, line_items
            );
        }

        Ok(record)
    }
}

impl ClaimExtractor for ModelOutputAdapter {
    fn source(&self) -> ExtractionSource {
        ExtractionSource::Model
    }

    fn extract(&self, input: &str, source_filename: &str) -> Result<PartialClaim> {
        Ok(PartialClaim::new(
            self.source(),
            self.parse(input, source_filename)?,
        ))
    }
}

/// Remove a Markdown code fence around the payload, if any.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(body) = FENCED_BLOCK.captures(trimmed).and_then(|c| c.get(1)) {
        return body.as_str().trim();
    }

    // Unterminated fence
    match OPENING_FENCE.find(trimmed) {
        Some(m) => trimmed[m.end()..].trim_end().trim_end_matches("```").trim(),
        None => trimmed,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::claim::{Admission, Diagnosis, Patient};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fenced_output_parses() {
        let raw = "```json\n{\"document\": {\"invoice_number\": \"10002\"}}\n```";

        let record = ModelOutputAdapter::new().parse(raw, "emily.pdf").unwrap();

        assert_eq!(record.document.invoice_number.as_deref(), Some("10002"));
        assert_eq!(record.document.source_filename, "emily.pdf");
    }

    #[test]
    fn test_fence_variants() {
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("Here you go:\n```json\n{\"a\": 1}\n```\nDone."), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_malformed_output() {
        let err = ModelOutputAdapter::new()
            .parse("I could not read this invoice.", "x.pdf")
            .unwrap_err();
        assert!(matches!(err, ClaimsError::MalformedModelOutput(_)));

        let err = ModelOutputAdapter::new().parse("[1, 2]", "x.pdf").unwrap_err();
        assert!(matches!(err, ClaimsError::MalformedModelOutput(_)));
    }

    #[test]
    fn test_extract_tags_model_source() {
        let partial = ModelOutputAdapter::new()
            .extract(r#"{"patient": {"name": "Miriam Njeri"}}"#, "miriam.pdf")
            .unwrap();

        assert_eq!(partial.source, ExtractionSource::Model);
        assert_eq!(partial.record.patient.name.as_deref(), Some("Miriam Njeri"));
        assert_eq!(partial.record.document.source_filename, "miriam.pdf");

        assert!(ModelOutputAdapter::new().extract("not json", "x.pdf").is_err());
    }

    #[test]
    fn test_source_filename_forced() {
        let raw = r#"{"document": {"source_filename": "invoice_scan_final.jpg"}}"#;

        let record = ModelOutputAdapter::new().parse(raw, "upload-7.pdf").unwrap();

        assert_eq!(record.document.source_filename, "upload-7.pdf");
    }

    #[test]
    fn test_missing_sections_default() {
        let raw = r#"{"document": {"invoice_date": "2025-06-17"}, "patient": null}"#;

        let record = ModelOutputAdapter::new().parse(raw, "a.pdf").unwrap();

        assert_eq!(
            record.document.invoice_date.as_deref(),
            Some("2025-06-17 00:00:00")
        );
        assert_eq!(record.patient, Patient::default());
        assert_eq!(record.admission, Admission::default());
        assert!(record.diagnoses.is_empty());
        assert!(record.medications.is_empty());
        assert!(record.procedures.is_empty());
    }

    #[test]
    fn test_model_lists_deduplicated() {
        let raw = r#"{
            "diagnoses": [
                {"description": "Hypertension", "icd10": "I10"},
                {"description": " Hypertension ", "icd10": "I10"},
                {"description": "", "icd10": "E11"},
                {"description": "Hypertension", "icd10": null}
            ]
        }"#;

        let record = ModelOutputAdapter::new().parse(raw, "a.pdf").unwrap();

        assert_eq!(
            record.diagnoses,
            vec![
                Diagnosis::new("Hypertension", Some("I10".into())),
                Diagnosis::new("Hypertension", None),
            ]
        );
    }
}
