//! Rendering of extracted documents.

use claimx_core::ExtractedDocument;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_document(
    document: &ExtractedDocument,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(document)?),
        OutputFormat::Csv => format_csv(document),
        OutputFormat::Text => Ok(format_text(document)),
    }
}

fn amount(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

fn format_csv(document: &ExtractedDocument) -> anyhow::Result<String> {
    let data = &document.data;
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "document_id",
        "source_filename",
        "invoice_number",
        "invoice_date",
        "facility",
        "insurer",
        "member_name",
        "patient_name",
        "diagnoses",
        "line_items",
        "invoice_amount",
        "net_amount",
        "currency",
    ])?;

    let diagnoses = data
        .diagnoses
        .iter()
        .map(|d| match &d.icd10 {
            Some(code) => format!("{} ({})", d.description, code),
            None => d.description.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ");

    wtr.write_record([
        document.document_id.to_string().as_str(),
        data.document.source_filename.as_str(),
        data.document.invoice_number.as_deref().unwrap_or(""),
        data.document.invoice_date.as_deref().unwrap_or(""),
        data.document.facility.as_deref().unwrap_or(""),
        data.document.insurer.as_deref().unwrap_or(""),
        data.member.member_name.as_deref().unwrap_or(""),
        data.patient.name.as_deref().unwrap_or(""),
        diagnoses.as_str(),
        data.line_items.len().to_string().as_str(),
        amount(data.totals.invoice_amount).as_str(),
        amount(data.totals.net_amount).as_str(),
        data.totals.currency.as_deref().unwrap_or(""),
    ])?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(document: &ExtractedDocument) -> String {
    let data = &document.data;
    let currency = data.totals.currency.as_deref().unwrap_or("");
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", document.document_id));
    output.push_str(&format!("File: {}\n", data.document.source_filename));
    if let Some(number) = &data.document.invoice_number {
        output.push_str(&format!("Invoice: {}\n", number));
    }
    if let Some(date) = &data.document.invoice_date {
        output.push_str(&format!("Date: {}\n", date));
    }
    if let Some(facility) = &data.document.facility {
        output.push_str(&format!("Facility: {}\n", facility));
    }
    output.push('\n');

    output.push_str("Patient:\n");
    output.push_str(&format!(
        "  {}\n",
        data.patient.name.as_deref().unwrap_or("unknown")
    ));
    if let Some(member) = &data.member.member_name {
        output.push_str(&format!(
            "  Member: {} {}\n",
            member,
            data.member.member_number.as_deref().unwrap_or("")
        ));
    }
    output.push('\n');

    if !data.diagnoses.is_empty() {
        output.push_str("Diagnoses:\n");
        for d in &data.diagnoses {
            match &d.icd10 {
                Some(code) => output.push_str(&format!("  {} [{}]\n", d.description, code)),
                None => output.push_str(&format!("  {}\n", d.description)),
            }
        }
        output.push('\n');
    }

    if !data.line_items.is_empty() {
        output.push_str("Line items:\n");
        for item in &data.line_items {
            output.push_str(&format!(
                "  {:<10} {:<40} {:>4} {:>12}\n",
                item.code.as_deref().unwrap_or("-"),
                item.description,
                item.qty.map(|q| q.to_string()).unwrap_or_default(),
                amount(item.line_total)
            ));
        }
        output.push('\n');
    }

    output.push_str("Totals:\n");
    output.push_str(&format!(
        "  Invoice: {} {}\n",
        amount(data.totals.invoice_amount),
        currency
    ));
    output.push_str(&format!(
        "  Net:     {} {}\n",
        amount(data.totals.net_amount),
        currency
    ));
    if let Some(balance) = data.totals.balance {
        output.push_str(&format!("  Balance: {:.2} {}\n", balance, currency));
    }

    if !document.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &document.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}
