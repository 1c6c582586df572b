//! CLI application for Moroccan financial document analysis.

mod commands;
mod extractor;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{analyze, batch, convert, rates};

/// Analyze Moroccan invoices and receipts from extracted text
#[derive(Parser)]
#[command(name = "madoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single document text file
    Analyze(analyze::AnalyzeArgs),

    /// Analyze multiple document text files
    Batch(batch::BatchArgs),

    /// Convert an amount between supported currencies
    Convert(convert::ConvertArgs),

    /// Show the exchange rate table
    Rates(rates::RatesArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Analyze(args) => analyze::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Convert(args) => convert::run(args, cli.config.as_deref()).await,
        Commands::Rates(args) => rates::run(args).await,
    }
}
