//! CLI application for medical claim extraction.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::{ask, batch, config, extract, preparse};

/// Medical claim extraction - Turn OCR text of claim invoices into structured records
#[derive(Parser)]
#[command(name = "claimx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a claim record from an OCR text file
    Extract(extract::ExtractArgs),

    /// Run only the pattern extractor (no model call)
    Preparse(preparse::PreparseArgs),

    /// Ask a question about an extracted document
    Ask(ask::AskArgs),

    /// Extract many OCR text files
    Batch(batch::BatchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // RUST_LOG directives refine the -v level.
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity_level(cli.verbose).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Preparse(args) => preparse::run(args),
        Commands::Ask(args) => ask::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path),
    }
}

fn verbosity_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(verbosity_level(0), LevelFilter::WARN);
        assert_eq!(verbosity_level(1), LevelFilter::INFO);
        assert_eq!(verbosity_level(2), LevelFilter::DEBUG);
        assert_eq!(verbosity_level(7), LevelFilter::TRACE);
    }

    #[test]
    fn test_default_directive_applies_without_rust_log() {
        let filter = EnvFilter::builder()
            .with_default_directive(verbosity_level(2).into())
            .parse_lossy("");

        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
