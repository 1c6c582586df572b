//! Batch command - analyze multiple text files sequentially.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use madoc_core::BatchOutcome;

use crate::extractor::PlainTextExtractor;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for per-document JSON results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let analyzer = super::build_analyzer(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching text files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    // Documents run strictly sequentially; the core invokes the callback
    // after each one.
    let outcome = analyzer
        .process_batch(&PlainTextExtractor, &files, |completed, _total, _failed| {
            pb.set_position(completed as u64);
        })
        .await;

    pb.finish_with_message("Complete");

    if let Some(ref output_dir) = args.output_dir {
        for analysis in &outcome.results {
            let stem = analysis
                .file_path
                .as_ref()
                .and_then(|p| p.file_stem())
                .and_then(|s| s.to_str())
                .unwrap_or("document");
            let path = output_dir.join(format!("{stem}.json"));
            fs::write(&path, serde_json::to_string_pretty(analysis)?)?;
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &outcome)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        files.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(outcome.results.len()).green(),
        style(outcome.errors.len()).red()
    );

    if !outcome.errors.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for error in &outcome.errors {
            println!("  - {}: {}", error.path.display(), error.error);
        }
    }

    Ok(())
}

fn write_summary(path: &PathBuf, outcome: &BatchOutcome) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "direction",
        "amount",
        "vat_amount",
        "date",
        "invoice_number",
        "primary_currency",
        "total_mad",
        "confidence",
        "processing_time_ms",
        "error",
    ])?;

    for analysis in &outcome.results {
        let filename = analysis
            .file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or("");

        wtr.write_record([
            filename.to_string(),
            "success".to_string(),
            format!("{:?}", analysis.classification.direction).to_lowercase(),
            analysis.financial_data.amount.to_string(),
            analysis.financial_data.vat.amount.to_string(),
            analysis
                .financial_data
                .date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            analysis
                .financial_data
                .invoice_number
                .clone()
                .unwrap_or_default(),
            analysis.currency_analysis.primary_currency.to_string(),
            format!("{:.4}", analysis.total_mad),
            format!("{:.2}", analysis.confidence),
            analysis.processing_time_ms.to_string(),
            String::new(),
        ])?;
    }

    for error in &outcome.errors {
        let filename = error
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        wtr.write_record([
            filename.to_string(),
            "error".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            error.error.clone(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
