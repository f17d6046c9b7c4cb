//! Chat prompts for structured extraction and question answering.

use claimx_inference::{ChatMessage, ChatRequest};

use crate::error::Result;
use crate::models::claim::ClaimRecord;
use crate::models::config::{ModelConfig, QaConfig};

/// System prompt for structured extraction: schema plus two worked examples.
pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"You extract structured data from the OCR text of medical invoices and insurance claim sheets.

Rules:
- Reply with a single JSON object that follows the schema below and nothing else.
- Use null for any value the text does not contain and [] for empty lists.
- Copy numbers, dates and codes exactly; amounts are plain numbers without currency symbols or separators.

Schema:
{
  "document": {
    "source_filename": "string",
    "invoice_number": "string|null",
    "invoice_date": "YYYY-MM-DD HH:MM:SS|null",
    "facility": "string|null",
    "insurer": "string|null",
    "scheme": "string|null",
    "claim_number": "string|null",
    "reference_no": "string|null",
    "card_or_referral_no": "string|null"
  },
  "member": {"member_name": "string|null", "member_number": "string|null"},
  "patient": {"name": "string|null", "age": "integer|null"},
  "diagnoses": [{"description": "string", "icd10": "string|null"}],
  "medications": [{"name": "string", "dosage": "string|null", "quantity": "string|null"}],
  "procedures": ["string"],
  "admission": {"was_admitted": "boolean", "admission_date": "YYYY-MM-DD|null", "discharge_date": "YYYY-MM-DD|null"},
  "line_items": [
    {"code": "string|null", "description": "string", "qty": "integer", "unit_price": "number|null", "line_total": "number"}
  ],
  "totals": {
    "net_amount": "number|null",
    "invoice_amount": "number|null",
    "total_settlement": "number|null",
    "balance": "number|null",
    "currency": "string|null"
  },
  "total_amount": "string|null"
}

Example 1
OCR text:
INVOICE NUMBER: 10002
MEMBER NAME: Emily Davis
MEMBER NUMBER: UU223344-06
INVOICE DATE: 2024-11-01 00:00:00
SERVICE PROVIDER: LIFELINK MEDICAL CENTER
DIAGNOSIS: Dermatitis
Patient Age: 34
13119033 DOXYCYCLINE 100MG TABLETS 1 3000 3000.0
Net Value: 3000.0

Output:
{
  "document": {"source_filename": "claim.pdf", "invoice_number": "10002", "invoice_date": "2024-11-01 00:00:00", "facility": "LIFELINK MEDICAL CENTER", "insurer": null, "scheme": null, "claim_number": null, "reference_no": null, "card_or_referral_no": null},
  "member": {"member_name": "Emily Davis", "member_number": "UU223344-06"},
  "patient": {"name": "Emily Davis", "age": 34},
  "diagnoses": [{"description": "Dermatitis", "icd10": null}],
  "medications": [{"name": "DOXYCYCLINE", "dosage": "100mg", "quantity": "1"}],
  "procedures": [],
  "admission": {"was_admitted": false, "admission_date": null, "discharge_date": null},
  "line_items": [{"code": "13119033", "description": "DOXYCYCLINE 100MG TABLETS", "qty": 1, "unit_price": 3000.0, "line_total": 3000.0}],
  "totals": {"net_amount": 3000.0, "invoice_amount": 3000.0, "total_settlement": null, "balance": null, "currency": null},
  "total_amount": "3000.00"
}

Example 2
OCR text:
FINAL INVOICE
Insurer Name: HEALTHGUARD
Scheme Name: HEALTHGUARD ELITE
Claim Number: 98276340215
Invoice Date: 2025-06-17
Patient Name: Miriam Njeri
Patient Age: 45
Diagnosis: Hypertension I10
Diagnosis: Type 2 Diabetes Mellitus E11
Procedure: Blood Glucose Test
Medication: Metformin 500mg - 30 tablets
Inv amt. 22,800.00

Output:
{
  "document": {"source_filename": "claim.pdf", "invoice_number": null, "invoice_date": "2025-06-17 00:00:00", "facility": null, "insurer": "HEALTHGUARD", "scheme": "HEALTHGUARD ELITE", "claim_number": "98276340215", "reference_no": null, "card_or_referral_no": null},
  "member": {"member_name": null, "member_number": null},
  "patient": {"name": "Miriam Njeri", "age": 45},
  "diagnoses": [{"description": "Hypertension", "icd10": "I10"}, {"description": "Type 2 Diabetes Mellitus", "icd10": "E11"}],
  "medications": [{"name": "Metformin", "dosage": "500mg", "quantity": "30 tablets"}],
  "procedures": ["Blood Glucose Test"],
  "admission": {"was_admitted": false, "admission_date": null, "discharge_date": null},
  "line_items": [],
  "totals": {"net_amount": null, "invoice_amount": 22800.0, "total_settlement": null, "balance": null, "currency": null},
  "total_amount": "22800.00"
}

Extract the following document and reply with the JSON object only."#;

/// System prompt for answering questions about one extracted claim.
pub const QUESTION_SYSTEM_PROMPT: &str = "You answer questions about a single medical claim document. \
Use the structured claim data and the original text you are given. \
Answer accurately and briefly. If the answer is not in the document, say so plainly.";

/// Messages asking the model to extract `text` from `source_filename`.
pub fn build_extraction_messages(text: &str, source_filename: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(EXTRACTION_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "source_filename: {}\n\nOCR TEXT:\n{}",
            source_filename, text
        )),
    ]
}

/// Messages asking `question` about an extracted record.
///
/// Only the first `max_chars` characters of the raw text are sent.
pub fn build_question_messages(
    question: &str,
    record: &ClaimRecord,
    raw_text: &str,
    max_chars: usize,
) -> Result<Vec<ChatMessage>> {
    let data = serde_json::to_string_pretty(record)?;
    let excerpt = truncate_chars(raw_text, max_chars);

    Ok(vec![
        ChatMessage::system(QUESTION_SYSTEM_PROMPT),
        ChatMessage::user(format!(
            "CLAIM DATA:\n{}\n\nORIGINAL TEXT:\n{}\n\nQuestion: {}\n\nAnswer clearly and concisely:",
            data, excerpt, question
        )),
    ])
}

/// Extraction request with the configured sampling settings.
pub fn build_extraction_request(
    config: &ModelConfig,
    text: &str,
    source_filename: &str,
) -> ChatRequest {
    let mut request = ChatRequest::new(
        config.model.clone(),
        build_extraction_messages(text, source_filename),
    );
    request.temperature = config.temperature;
    request.max_tokens = config.max_tokens;
    request.top_p = config.top_p;
    request.top_k = config.top_k;
    request.repetition_penalty = config.repetition_penalty;
    request.stop = config.stop.clone();
    request.timeout_secs = config.timeout_secs;
    request
}

/// Question request: model identity and stop sequences from `model`,
/// sampling from `qa`.
pub fn build_question_request(
    model: &ModelConfig,
    qa: &QaConfig,
    question: &str,
    record: &ClaimRecord,
    raw_text: &str,
) -> Result<ChatRequest> {
    let messages = build_question_messages(question, record, raw_text, qa.max_context_chars)?;

    let mut request = ChatRequest::new(model.model.clone(), messages);
    request.temperature = qa.temperature;
    request.max_tokens = qa.max_tokens;
    request.top_p = qa.top_p;
    request.stop = model.stop.clone();
    request.timeout_secs = qa.timeout_secs;
    Ok(request)
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimx_inference::Role;

    #[test]
    fn test_extraction_messages() {
        let messages = build_extraction_messages("INVOICE NUMBER: 1", "a.pdf");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("card_or_referral_no"));
        assert_eq!(
            messages[1].content,
            "source_filename: a.pdf\n\nOCR TEXT:\nINVOICE NUMBER: 1"
        );
    }

    #[test]
    fn test_extraction_request_uses_model_config() {
        let config = ModelConfig {
            model: "test-model".into(),
            max_tokens: 99,
            timeout_secs: 7,
            ..ModelConfig::default()
        };

        let request = build_extraction_request(&config, "text", "a.pdf");

        assert_eq!(request.model, "test-model");
        assert_eq!(request.max_tokens, 99);
        assert_eq!(request.timeout_secs, 7);
        assert_eq!(request.top_k, Some(50));
        assert_eq!(request.stop, vec!["<|eot_id|>", "<|eom_id|>"]);
    }

    #[test]
    fn test_question_context_truncated_by_chars() {
        let raw = "₦".repeat(10);
        let record = ClaimRecord::for_file("a.pdf");

        let messages = build_question_messages("Total?", &record, &raw, 4).unwrap();

        assert!(messages[1].content.contains("ORIGINAL TEXT:\n₦₦₦₦\n\nQuestion: Total?"));
        assert!(messages[1].content.contains("\"source_filename\": \"a.pdf\""));
    }

    #[test]
    fn test_question_request_uses_qa_sampling() {
        let request = build_question_request(
            &ModelConfig::default(),
            &QaConfig::default(),
            "Who is the patient?",
            &ClaimRecord::default(),
            "Patient Name: X",
        )
        .unwrap();

        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.max_tokens, 300);
        assert_eq!(request.timeout_secs, 30);
        assert_eq!(request.top_k, None);
    }
}
