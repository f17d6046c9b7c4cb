//! End-to-end extraction over a chat backend.

use std::time::Instant;

use claimx_inference::ChatBackend;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::claim::merge::merge_into;
use crate::claim::text::clean_text;
use crate::claim::{ClaimExtractor, ModelOutputAdapter, PatternExtractor};
use crate::error::{ClaimsError, Result};
use crate::models::claim::ClaimRecord;
use crate::models::config::ClaimsConfig;
use crate::prompt::{build_extraction_request, build_question_request};

/// A merged claim record together with the text it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Identifier generated for this extraction.
    pub document_id: Uuid,
    /// File name supplied by the caller.
    pub filename: String,
    /// Cleaned document text.
    pub raw_text: String,
    /// Canonical claim record.
    pub data: ClaimRecord,
    /// Gaps found in the merged record.
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    #[serde(default)]
    pub processing_time_ms: u64,
}

/// Pattern extraction only, for offline inspection. Needs no backend.
pub fn preparse(raw_text: &str, filename: &str) -> Result<ClaimRecord> {
    let text = clean_text(raw_text);
    if text.is_empty() {
        return Err(ClaimsError::EmptyDocument);
    }
    Ok(PatternExtractor::new().extract(&text, filename)?.record)
}

/// Extraction pipeline: pattern pass, model pass, merge.
pub struct ClaimPipeline<B: ChatBackend> {
    config: ClaimsConfig,
    backend: B,
    patterns: PatternExtractor,
    adapter: ModelOutputAdapter,
}

impl<B: ChatBackend> ClaimPipeline<B> {
    pub fn new(config: ClaimsConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            patterns: PatternExtractor::new(),
            adapter: ModelOutputAdapter::new(),
        }
    }

    pub fn config(&self) -> &ClaimsConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Extract a claim document from OCR text.
    ///
    /// Upstream and malformed-output errors abort the document; there is no
    /// pattern-only fallback.
    pub async fn extract(&self, raw_text: &str, filename: &str) -> Result<ExtractedDocument> {
        let start = Instant::now();

        let text = clean_text(raw_text);
        if text.is_empty() {
            return Err(ClaimsError::EmptyDocument);
        }

        let data = self.extract_record(&text, filename).await?;

        let warnings = data.validate();
        for warning in &warnings {
            debug!("{}: {}", filename, warning);
        }

        let document = ExtractedDocument {
            document_id: Uuid::new_v4(),
            filename: filename.to_string(),
            raw_text: text,
            data,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Extracted {} as {} in {}ms",
            filename, document.document_id, document.processing_time_ms
        );

        Ok(document)
    }

    /// Run both extractors over cleaned `text` and merge their records.
    pub async fn extract_record(&self, text: &str, filename: &str) -> Result<ClaimRecord> {
        let pattern = self.patterns.extract(text, filename)?;

        let request = build_extraction_request(&self.config.model, text, filename);
        let reply = self
            .backend
            .complete(&request)
            .await
            .inspect_err(|e| warn!("Extraction call to {} failed: {}", self.backend.name(), e))?;

        let model = self.adapter.extract(&reply, filename)?;
        debug!(
            "Reconciling {:?} record into {:?} record",
            pattern.source, model.source
        );

        let mut record = model.record;
        let report = merge_into(&pattern.record, &mut record);
        info!(
            "Merged {}: {} fields filled, {} diagnoses and {} line items added from patterns",
            filename,
            report.filled.len(),
            report.diagnoses_added,
            report.line_items_added
        );

        if record.totals.currency.is_none() {
            record.totals.currency = self.config.extraction.default_currency.clone();
        }

        Ok(record)
    }

    /// Answer a question about an extracted document.
    pub async fn answer(&self, question: &str, document: &ExtractedDocument) -> Result<String> {
        let request = build_question_request(
            &self.config.model,
            &self.config.qa,
            question,
            &document.data,
            &document.raw_text,
        )?;

        debug!("Answering question about {}", document.document_id);
        Ok(self.backend.complete(&request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use claimx_inference::{ChatRequest, InferenceError};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    enum Reply {
        Text(&'static str),
        Timeout,
    }

    struct FakeBackend {
        reply: Reply,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl FakeBackend {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for FakeBackend {
        async fn complete(&self, request: &ChatRequest) -> claimx_inference::Result<String> {
            self.requests.lock().unwrap().push(request.clone());
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Timeout => Err(InferenceError::Timeout(request.timeout_secs)),
            }
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    const INVOICE: &str = "
        INVOICE NUMBER: 10002
        MEMBER NAME: Emily Davis

        DIAGNOSIS: Dermatitis
        13119033 DOXYCYCLINE 100MG TABLETS 1 3000 3000.0
        20045001 CONSULTATION 1 19800 19800.0
        Inv amt. 22,800.00
    ";

    const MODEL_REPLY: &str = r#"```json
{
  "document": {"source_filename": "made-up.jpg", "invoice_number": "10002", "invoice_date": "2024-11-01"},
  "patient": {"name": "Emily Davis", "age": 34},
  "diagnoses": [{"description": "Dermatitis", "icd10": null}],
  "line_items": [{"code": "13119033", "description": "DOXYCYCLINE 100MG TABLETS", "qty": 1, "unit_price": 3000, "line_total": 3000}],
  "totals": {"invoice_amount": null}
}
```"#;

    #[tokio::test]
    async fn test_extract_merges_model_and_patterns() {
        let pipeline =
            ClaimPipeline::new(ClaimsConfig::default(), FakeBackend::new(Reply::Text(MODEL_REPLY)));

        let document = pipeline.extract(INVOICE, "emily.pdf").await.unwrap();
        let data = &document.data;

        assert_eq!(document.filename, "emily.pdf");
        assert!(document.raw_text.starts_with("INVOICE NUMBER: 10002\nMEMBER NAME"));
        assert_eq!(data.document.source_filename, "emily.pdf");
        assert_eq!(data.document.invoice_date.as_deref(), Some("2024-11-01 00:00:00"));
        assert_eq!(data.member.member_name.as_deref(), Some("Emily Davis"));
        assert_eq!(data.diagnoses.len(), 1);
        assert_eq!(data.line_items.len(), 2);
        assert_eq!(data.line_items[1].code.as_deref(), Some("20045001"));
        assert_eq!(data.totals.invoice_amount, Some(22800.0));
        assert!(document.warnings.is_empty());

        let requests = pipeline.backend().requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].timeout_secs, 60);
        assert!(requests[0].messages[1].content.contains("source_filename: emily.pdf"));
    }

    #[tokio::test]
    async fn test_timeout_aborts_document() {
        let pipeline =
            ClaimPipeline::new(ClaimsConfig::default(), FakeBackend::new(Reply::Timeout));

        let err = pipeline.extract(INVOICE, "emily.pdf").await.unwrap_err();

        assert!(matches!(err, ClaimsError::Upstream(InferenceError::Timeout(60))));
    }

    #[tokio::test]
    async fn test_malformed_reply_aborts_document() {
        let pipeline = ClaimPipeline::new(
            ClaimsConfig::default(),
            FakeBackend::new(Reply::Text("Sorry, I cannot help with that.")),
        );

        let err = pipeline.extract(INVOICE, "emily.pdf").await.unwrap_err();

        assert!(matches!(err, ClaimsError::MalformedModelOutput(_)));
    }

    #[tokio::test]
    async fn test_blank_text_rejected_before_model_call() {
        let pipeline =
            ClaimPipeline::new(ClaimsConfig::default(), FakeBackend::new(Reply::Text("{}")));

        let err = pipeline.extract(" \n \n", "blank.pdf").await.unwrap_err();

        assert!(matches!(err, ClaimsError::EmptyDocument));
        assert!(pipeline.backend().requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_default_currency_applied() {
        let mut config = ClaimsConfig::default();
        config.extraction.default_currency = Some("NGN".into());
        let pipeline = ClaimPipeline::new(config, FakeBackend::new(Reply::Text("{}")));

        let document = pipeline.extract(INVOICE, "emily.pdf").await.unwrap();

        assert_eq!(document.data.totals.currency.as_deref(), Some("NGN"));
    }

    #[tokio::test]
    async fn test_answer_uses_qa_settings() {
        let pipeline = ClaimPipeline::new(
            ClaimsConfig::default(),
            FakeBackend::new(Reply::Text("The patient is Emily Davis.")),
        );
        let document = ExtractedDocument {
            document_id: Uuid::new_v4(),
            filename: "emily.pdf".into(),
            raw_text: "Patient Name: Emily Davis".into(),
            data: ClaimRecord::for_file("emily.pdf"),
            warnings: Vec::new(),
            processing_time_ms: 0,
        };

        let answer = pipeline.answer("Who is the patient?", &document).await.unwrap();

        assert_eq!(answer, "The patient is Emily Davis.");
        let requests = pipeline.backend().requests.lock().unwrap();
        assert_eq!(requests[0].timeout_secs, 30);
        assert!(requests[0].messages[1].content.contains("Question: Who is the patient?"));
    }

    #[test]
    fn test_preparse_cleans_and_extracts() {
        let record = preparse(INVOICE, "emily.pdf").unwrap();

        assert_eq!(record.document.source_filename, "emily.pdf");
        assert_eq!(record.document.invoice_number.as_deref(), Some("10002"));
        assert_eq!(record.line_items.len(), 2);
    }

    #[test]
    fn test_preparse_blank_text() {
        assert!(matches!(
            preparse("\n   \n", "blank.pdf"),
            Err(ClaimsError::EmptyDocument)
        ));
    }
}
