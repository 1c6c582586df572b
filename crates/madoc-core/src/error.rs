//! Error types for the madoc-core library.

use thiserror::Error;

use crate::currency::Currency;

/// Main error type for the madoc library.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Text extraction error from the upstream extractor.
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Exchange rate error.
    #[error("rate error: {0}")]
    Rate(#[from] RateError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by text-extraction collaborators.
///
/// Field extraction itself never fails; these cover the boundary to the
/// upstream OCR/text-layer extractors only.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The document format is not handled by the extractor.
    #[error("unsupported document type: {0}")]
    Unsupported(String),

    /// The document could not be read.
    #[error("failed to read document: {0}")]
    Read(String),

    /// The extractor returned no text.
    #[error("document produced no text")]
    Empty,
}

/// Errors related to exchange rate retrieval.
#[derive(Error, Debug)]
pub enum RateError {
    /// The rate provider call failed.
    #[error("rate provider failed: {0}")]
    Provider(String),

    /// The rate table is missing a currency.
    #[error("no rate available for {0}")]
    MissingRate(Currency),
}

/// Result type for the madoc library.
pub type Result<T> = std::result::Result<T, AnalysisError>;
