//! Ask command - question answering over a saved document.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use claimx_core::ExtractedDocument;

use super::{build_pipeline, load_config};

/// Arguments for the ask command.
#[derive(Args)]
pub struct AskArgs {
    /// Document JSON written by `claimx extract`
    #[arg(required = true)]
    document: PathBuf,

    /// Question about the document
    #[arg(required = true)]
    question: String,
}

pub async fn run(args: AskArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    if !args.document.exists() {
        anyhow::bail!("Document not found: {}", args.document.display());
    }

    let document: ExtractedDocument = serde_json::from_str(&fs::read_to_string(&args.document)?)
        .map_err(|e| {
            anyhow::anyhow!("{} is not an extracted document: {}", args.document.display(), e)
        })?;

    let pipeline = build_pipeline(load_config(config_path)?)?;
    let answer = pipeline.answer(&args.question, &document).await?;

    println!("{}", answer);

    Ok(())
}
