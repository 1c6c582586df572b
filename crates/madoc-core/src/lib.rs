//! Core library for Moroccan financial document analysis.
//!
//! This crate provides:
//! - Text normalization and regex-based field extraction (amounts, VAT,
//!   dates, invoice numbers, tax IDs, counterparties)
//! - Expense/revenue direction classification with weighted keyword tiers
//!   and Moroccan form-structure heuristics
//! - Multi-currency detection with confidence scoring, rate caching, and
//!   conversion to the MAD reporting base
//! - A per-document analysis pipeline with sequential batch orchestration
//!
//! OCR and format-specific text extraction are external collaborators
//! behind the [`TextExtractor`] trait; the exchange rate source is
//! pluggable behind [`RateProvider`].

pub mod analyzer;
pub mod classify;
pub mod currency;
pub mod error;
pub mod extract;
pub mod models;
pub mod text;

pub use analyzer::{DocumentAnalyzer, TextExtractor};
pub use classify::DirectionClassifier;
pub use currency::{
    convert_currency, format_currency, format_currency_code, Currency, CurrencyDetector,
    ExchangeRateCache, RateProvider, RateTable, SimulatedRateProvider,
};
pub use error::{AnalysisError, ExtractError, RateError, Result};
pub use extract::FinancialExtractor;
pub use models::analysis::{
    AnalysisOptions, BatchError, BatchOutcome, ClassificationMethod, ClassificationResult,
    Companies, Conversion, CurrencyAnalysis, CurrencyMention, Direction, DocumentAnalysis,
    DocumentType, ExchangeRateSnapshot, FinancialData, RawDocumentText, VatInfo,
};
pub use models::config::AnalysisConfig;
pub use text::normalize_text;
