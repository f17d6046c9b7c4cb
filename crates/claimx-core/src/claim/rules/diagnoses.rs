//! Diagnosis extraction for claim invoices.

use crate::models::claim::Diagnosis;

use super::patterns::{CODED_DIAGNOSIS, CONDITION_KEYWORDS, DIAGNOSIS_LABEL};

/// Extract diagnoses in text order of rule: the first `DIAGNOSIS:` label,
/// then every coded line naming a known condition.
pub fn extract_diagnoses(text: &str) -> Vec<Diagnosis> {
    let mut diagnoses = Vec::new();

    if let Some(caps) = DIAGNOSIS_LABEL.captures(text) {
        let description = caps[1].trim();
        if !description.is_empty() {
            diagnoses.push(Diagnosis::new(description, None));
        }
    }

    for line in text.lines() {
        if let Some(diagnosis) = parse_coded_diagnosis(line.trim()) {
            diagnoses.push(diagnosis);
        }
    }

    diagnoses
}

/// Parse `"<description> <CODE>"`, accepting it only for known conditions.
fn parse_coded_diagnosis(line: &str) -> Option<Diagnosis> {
    let caps = CODED_DIAGNOSIS.captures(line)?;
    let description = caps[1].trim();
    let code = caps[2].trim();

    if !mentions_condition(description) {
        return None;
    }

    Some(Diagnosis::new(description, Some(code.to_string())))
}

fn mentions_condition(description: &str) -> bool {
    let lower = description.to_lowercase();
    CONDITION_KEYWORDS.iter().any(|k| lower.contains(k))
}
