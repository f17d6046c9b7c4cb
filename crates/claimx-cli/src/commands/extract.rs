//! Extract command - full pipeline over a single OCR text file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use super::output::{format_document, OutputFormat};
use super::{build_pipeline, load_config, read_text, source_filename};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// OCR text file
    #[arg(required = true)]
    input: PathBuf,

    /// File name to record as the document source (default: input file name)
    #[arg(long)]
    filename: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: ExtractArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let pipeline = build_pipeline(config)?;

    let text = read_text(&args.input)?;
    let filename = source_filename(&args.input, args.filename.as_deref());

    info!("Extracting {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Calling model...");
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = pipeline.extract(&text, &filename).await;
    pb.finish_and_clear();
    let document = result?;

    let output = format_document(&document, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
