//! Data model for per-document financial analysis results.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::currency::{Currency, RateTable};

/// Raw text handed in by an upstream extractor, plus basic metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocumentText {
    /// Extracted text content.
    pub text: String,

    /// Source document format.
    pub document_type: DocumentType,

    /// Extractor-specific metadata (page count, OCR engine, ...).
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Source document format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Pdf,
    Image,
    Docx,
    #[default]
    Unknown,
}

/// Transaction direction of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Expense document (purchase invoice, supplier bill).
    Incoming,
    /// Revenue document (sales invoice, client bill).
    Outgoing,
    /// Could not determine.
    #[default]
    Unknown,
}

/// VAT rate and amount extracted from a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VatInfo {
    /// Rate as a decimal fraction (0.20 for the Moroccan standard rate).
    pub rate: f64,

    /// VAT amount, 0 when no VAT-tagged figure was found.
    pub amount: f64,
}

/// Counterparty details extracted from a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Companies {
    /// All company-name matches, in document order.
    pub names: Vec<String>,

    /// All tax identifier matches (IF, ICE, RC, ...), in document order.
    pub tax_ids: Vec<String>,
}

/// Aggregated financial fields for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialData {
    /// Total amount; 0 when nothing amount-like was found.
    pub amount: f64,

    /// VAT information.
    pub vat: VatInfo,

    /// Document date, when one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Invoice number, when one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Direction pre-pass from the extractor's flat keyword vote.
    pub direction: Direction,

    /// Counterparties.
    pub companies: Companies,

    /// Fraction of the six target fields that were populated (0.0 - 1.0).
    pub confidence: f64,

    /// Financial vocabulary found in the document.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Payment terms text, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<String>,

    /// Bank account reference (RIB/IBAN), when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<String>,
}

/// Which classification rule produced the final direction verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    /// Adopted from the extractor's direction pre-pass.
    FinancialData,
    /// Weighted keyword scoring.
    Keywords,
    /// Client/supplier form-field structure.
    FormStructure,
    /// Seller/buyer ICE ordering.
    IceStructure,
    /// Closing-phrase heuristic.
    Phrasing,
    /// Classification failed entirely.
    Error,
}

/// Direction verdict for one document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Direction of the transaction.
    #[serde(rename = "type")]
    pub direction: Direction,

    /// Confidence in the verdict (0.0 - 1.0, capped at 0.95).
    pub confidence: f64,

    /// Rule that decided.
    pub method: ClassificationMethod,
}

impl Default for ClassificationResult {
    fn default() -> Self {
        Self {
            direction: Direction::Unknown,
            confidence: 0.0,
            method: ClassificationMethod::Error,
        }
    }
}

/// One detected currency occurrence in document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyMention {
    /// Detected currency.
    pub code: Currency,

    /// Amount as written in the document.
    pub original_amount: f64,

    /// Byte offset of the match in the source text.
    pub position: usize,

    /// Length of the matched span.
    pub match_length: usize,

    /// The matched span itself.
    pub matched_text: String,

    /// Detection confidence (0.0 - 1.0).
    pub confidence: f64,

    /// Whether confidence clears the per-currency reliability threshold.
    pub is_reliable: bool,

    /// MAD equivalent, filled in by the converter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mad_equivalent: Option<f64>,

    /// Cross rate used for the MAD conversion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_rate: Option<f64>,
}

/// Count of mentions for one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFrequency {
    pub code: Currency,
    pub count: usize,
}

/// Document-level currency summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyAnalysis {
    /// The document's dominant currency.
    pub primary_currency: Currency,

    /// True when every mention of the primary currency scored above 0.7.
    pub reliable: bool,

    /// Distinct currencies found, in first-appearance order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub currencies_found: Vec<Currency>,

    /// Mention counts, most frequent first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub most_frequent: Vec<CurrencyFrequency>,
}

impl Default for CurrencyAnalysis {
    fn default() -> Self {
        Self {
            primary_currency: Currency::MAD,
            reliable: true,
            currencies_found: Vec::new(),
            most_frequent: Vec::new(),
        }
    }
}

/// Result of one currency conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Input amount.
    pub amount: f64,

    /// Converted amount, rounded to 4 decimal places.
    pub converted_amount: f64,

    pub from: Currency,
    pub to: Currency,

    /// Direct cross rate applied.
    pub rate: f64,

    /// Rate date.
    pub date: NaiveDate,

    /// True when a historical rate table was used.
    pub is_historical: bool,

    /// True when the static fallback table was used instead of live rates.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub used_fallback: bool,

    /// Original amount, locale-formatted.
    pub formatted_original: String,

    /// Converted amount, locale-formatted.
    pub formatted_converted: String,
}

/// A rate table for the base currency at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRateSnapshot {
    /// Triangulation base (always MAD in this system).
    pub base: Currency,

    /// Value of 1 base unit in each currency.
    pub rates: RateTable,

    /// When the snapshot was fetched.
    pub fetched_at: DateTime<Utc>,

    /// Provider that produced the table.
    pub source: String,

    /// True for date-pinned historical tables.
    pub is_historical: bool,
}

/// Final aggregate record for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    /// Path of the source file, when processed from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// Source document format.
    pub document_type: DocumentType,

    /// Direction verdict.
    pub classification: ClassificationResult,

    /// Extracted financial fields.
    pub financial_data: FinancialData,

    /// Detected currency mentions with MAD equivalents.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub currencies: Vec<CurrencyMention>,

    /// True when any non-MAD mention was found.
    pub has_foreign_currency: bool,

    /// Sum of all mentions' MAD equivalents.
    pub total_mad: f64,

    /// Document-level currency summary.
    pub currency_analysis: CurrencyAnalysis,

    /// Overall extraction confidence (0.0 - 1.0).
    pub confidence: f64,

    /// Wall-clock processing time.
    pub processing_time_ms: u64,

    /// Set when the pipeline recovered from a document-level failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a sequential batch run.
#[derive(Debug, Default, Serialize)]
pub struct BatchOutcome {
    /// Successful analyses, in input order.
    pub results: Vec<DocumentAnalysis>,

    /// Failed items, in input order.
    pub errors: Vec<BatchError>,
}

/// A single failed batch item.
#[derive(Debug, Clone, Serialize)]
pub struct BatchError {
    /// The failed input.
    pub path: PathBuf,

    /// Failure description.
    pub error: String,
}

/// Per-run options for document analysis.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Source file path recorded on the result.
    pub file_path: Option<PathBuf>,

    /// Historical rate date for currency conversion.
    pub date: Option<NaiveDate>,
}
