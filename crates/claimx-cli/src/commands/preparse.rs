//! Preparse command - pattern extraction only.

use std::path::PathBuf;

use clap::Args;

use claimx_core::preparse;

use super::{read_text, source_filename};

/// Arguments for the preparse command.
#[derive(Args)]
pub struct PreparseArgs {
    /// OCR text file
    #[arg(required = true)]
    input: PathBuf,

    /// File name to record as the document source (default: input file name)
    #[arg(long)]
    filename: Option<String>,
}

pub fn run(args: PreparseArgs) -> anyhow::Result<()> {
    let text = read_text(&args.input)?;
    let filename = source_filename(&args.input, args.filename.as_deref());
    let record = preparse(&text, &filename)?;

    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(())
}
