//! Analyze command - extract financial data from a single text file.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use madoc_core::{AnalysisOptions, DocumentAnalysis, TextExtractor};

use crate::extractor::PlainTextExtractor;

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input text file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Historical rate date (YYYY-MM-DD) for currency conversion
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Show field-level confidence details
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let analyzer = super::build_analyzer(config_path)?;

    let raw = PlainTextExtractor
        .extract_text(&args.input)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", args.input.display()))?;

    let options = AnalysisOptions {
        file_path: Some(args.input.clone()),
        date: args.date,
    };
    let analysis = analyzer
        .process_document_text(&raw.text, raw.document_type, options)
        .await;

    let content = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&analysis)?,
        OutputFormat::Csv => format_analysis_csv(&analysis)?,
        OutputFormat::Text => format_analysis_text(&analysis),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, content)?;
            println!("{} Wrote analysis to {}", style("✓").green(), path.display());
        }
        None => println!("{content}"),
    }

    if args.show_confidence {
        eprintln!();
        eprintln!(
            "extraction confidence: {:.2}  classification: {:?} ({:.2} via {:?})",
            analysis.confidence,
            analysis.classification.direction,
            analysis.classification.confidence,
            analysis.classification.method,
        );
    }

    Ok(())
}

pub fn format_analysis_csv(analysis: &DocumentAnalysis) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "file",
        "direction",
        "classification_confidence",
        "amount",
        "vat_rate",
        "vat_amount",
        "date",
        "invoice_number",
        "primary_currency",
        "total_mad",
        "confidence",
    ])?;

    wtr.write_record([
        analysis
            .file_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        format!("{:?}", analysis.classification.direction).to_lowercase(),
        format!("{:.2}", analysis.classification.confidence),
        analysis.financial_data.amount.to_string(),
        analysis.financial_data.vat.rate.to_string(),
        analysis.financial_data.vat.amount.to_string(),
        analysis
            .financial_data
            .date
            .map(|d| d.to_string())
            .unwrap_or_default(),
        analysis.financial_data.invoice_number.clone().unwrap_or_default(),
        analysis.currency_analysis.primary_currency.to_string(),
        analysis.total_mad.to_string(),
        format!("{:.2}", analysis.confidence),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_analysis_text(analysis: &DocumentAnalysis) -> String {
    let mut output = String::new();
    let data = &analysis.financial_data;

    if let Some(path) = &analysis.file_path {
        output.push_str(&format!("Document: {}\n", path.display()));
    }
    output.push_str(&format!(
        "Direction: {:?} ({:.0}% via {:?})\n",
        analysis.classification.direction,
        analysis.classification.confidence * 100.0,
        analysis.classification.method,
    ));
    output.push('\n');

    output.push_str(&format!(
        "Amount: {}\n",
        madoc_core::format_currency(data.amount, analysis.currency_analysis.primary_currency)
    ));
    output.push_str(&format!(
        "VAT:    {:.0}% / {:.2}\n",
        data.vat.rate * 100.0,
        data.vat.amount
    ));
    if let Some(date) = data.date {
        output.push_str(&format!("Date:   {date}\n"));
    }
    if let Some(number) = &data.invoice_number {
        output.push_str(&format!("Number: {number}\n"));
    }

    if !data.companies.names.is_empty() {
        output.push('\n');
        output.push_str("Companies:\n");
        for name in &data.companies.names {
            output.push_str(&format!("  {name}\n"));
        }
    }
    if !data.companies.tax_ids.is_empty() {
        output.push_str("Tax IDs:\n");
        for id in &data.companies.tax_ids {
            output.push_str(&format!("  {id}\n"));
        }
    }

    if !analysis.currencies.is_empty() {
        output.push('\n');
        output.push_str(&format!(
            "Currencies ({} primary, {}):\n",
            analysis.currency_analysis.primary_currency,
            if analysis.currency_analysis.reliable {
                "reliable"
            } else {
                "unreliable"
            }
        ));
        for mention in &analysis.currencies {
            output.push_str(&format!(
                "  {} {} -> {:.4} MAD\n",
                mention.original_amount,
                mention.code,
                mention.mad_equivalent.unwrap_or_default()
            ));
        }
    }

    output.push('\n');
    output.push_str(&format!("Confidence: {:.2}\n", analysis.confidence));

    output
}
