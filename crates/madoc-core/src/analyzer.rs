//! Per-document analysis pipeline and sequential batch orchestration.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::classify::DirectionClassifier;
use crate::currency::{convert_currency, Currency, CurrencyDetector, ExchangeRateCache};
use crate::error::{ExtractError, Result};
use crate::extract::FinancialExtractor;
use crate::models::analysis::{
    AnalysisOptions, BatchError, BatchOutcome, CurrencyMention, DocumentAnalysis, DocumentType,
    RawDocumentText,
};
use crate::models::config::AnalysisConfig;
use crate::text::normalize_text;

/// Upstream collaborator that turns a file into raw text.
///
/// PDF/image/DOCX extraction lives outside this crate; implementations
/// may be slow or OCR-backed, hence async.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract raw text and basic metadata from a document file.
    async fn extract_text(&self, path: &Path) -> std::result::Result<RawDocumentText, ExtractError>;
}

/// Composes normalization, field extraction, classification, and currency
/// handling into one per-document record, and runs sequential batches.
pub struct DocumentAnalyzer {
    config: AnalysisConfig,
    extractor: FinancialExtractor,
    classifier: DirectionClassifier,
    detector: CurrencyDetector,
    cache: ExchangeRateCache,
}

impl DocumentAnalyzer {
    /// Analyzer over the simulated rate provider.
    pub fn new(config: AnalysisConfig) -> Self {
        let cache = ExchangeRateCache::with_ttl(
            Box::new(crate::currency::SimulatedRateProvider),
            config.rate_cache_ttl_ms,
        );
        Self::with_cache(config, cache)
    }

    /// Analyzer over an explicitly constructed rate cache, so tests and
    /// hosts can swap the provider without touching calling code.
    pub fn with_cache(config: AnalysisConfig, cache: ExchangeRateCache) -> Self {
        let extractor = FinancialExtractor::new().with_default_vat_rate(config.default_vat_rate);
        let classifier =
            DirectionClassifier::new().with_tie_margin(config.classification_tie_margin);
        let detector = CurrencyDetector::from_config(&config);

        Self {
            config,
            extractor,
            classifier,
            detector,
            cache,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The rate cache, for standalone conversions.
    pub fn rate_cache(&self) -> &ExchangeRateCache {
        &self.cache
    }

    /// Detect currency mentions without running the full pipeline.
    pub fn detect_currencies(&self, text: &str) -> Vec<CurrencyMention> {
        self.detector.detect(text)
    }

    /// Run the full analysis pipeline over raw document text.
    ///
    /// Always returns a well-formed record: missing fields surface as
    /// defaults and conversion failures as fallback values, never as
    /// errors.
    pub async fn process_document_text(
        &self,
        raw_text: &str,
        document_type: DocumentType,
        options: AnalysisOptions,
    ) -> DocumentAnalysis {
        let start = Instant::now();
        info!(?document_type, text_len = raw_text.len(), "processing document text");

        // Field extraction and classification read normalized text;
        // currency detection reads the raw text so Arabic labels survive.
        let normalized = normalize_text(raw_text);
        let financial_data = self.extractor.extract(&normalized);
        let classification = self.classifier.classify(&financial_data, &normalized);

        let mut currencies = self.detector.detect(raw_text);

        // One snapshot for all conversions in this document.
        let (rates, _used_fallback) = self.cache.rates_or_default(options.date).await;
        let mut total_mad = 0.0;
        for mention in currencies.iter_mut() {
            let conversion = convert_currency(
                &self.cache,
                mention.original_amount,
                mention.code,
                Currency::MAD,
                Some(&rates),
                options.date,
            )
            .await;
            total_mad += conversion.converted_amount;
            mention.mad_equivalent = Some(conversion.converted_amount);
            mention.conversion_rate = Some(conversion.rate);
        }

        let has_foreign_currency = currencies.iter().any(|m| m.code != Currency::MAD);
        let currency_analysis = self.detector.analyze(&currencies);
        let confidence = financial_data.confidence;

        debug!(
            direction = ?classification.direction,
            confidence,
            currencies = currencies.len(),
            "document analysis assembled"
        );

        DocumentAnalysis {
            file_path: options.file_path,
            document_type,
            classification,
            financial_data,
            currencies,
            has_foreign_currency,
            total_mad,
            currency_analysis,
            confidence,
            processing_time_ms: start.elapsed().as_millis() as u64,
            error: None,
        }
    }

    /// Extract text through the collaborator, then analyze it.
    pub async fn process_document(
        &self,
        extractor: &dyn TextExtractor,
        path: &Path,
    ) -> Result<DocumentAnalysis> {
        debug!(path = %path.display(), "extracting document text");
        let raw = extractor.extract_text(path).await?;

        let options = AnalysisOptions {
            file_path: Some(path.to_path_buf()),
            date: None,
        };
        Ok(self
            .process_document_text(&raw.text, raw.document_type, options)
            .await)
    }

    /// Process documents strictly sequentially, in input order.
    ///
    /// Documents are never analyzed in parallel: upstream OCR resources
    /// stay bounded and progress reporting stays deterministic. The
    /// progress callback receives `(completed, total, failed)` after every
    /// document, and a failing document lands in `errors` without aborting
    /// the rest.
    pub async fn process_batch(
        &self,
        extractor: &dyn TextExtractor,
        paths: &[PathBuf],
        mut on_progress: impl FnMut(usize, usize, usize),
    ) -> BatchOutcome {
        info!(count = paths.len(), "processing document batch");

        let mut outcome = BatchOutcome::default();
        let total = paths.len();
        let mut completed = 0usize;

        for path in paths {
            match self.process_document(extractor, path).await {
                Ok(analysis) => {
                    outcome.results.push(analysis);
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "document failed in batch");
                    outcome.errors.push(BatchError {
                        path: path.clone(),
                        error: e.to_string(),
                    });
                }
            }

            completed += 1;
            on_progress(completed, total, outcome.errors.len());
        }

        info!(
            total,
            successful = outcome.results.len(),
            failed = outcome.errors.len(),
            "batch processing completed"
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::Direction;
    use pretty_assertions::assert_eq;

    struct FakeExtractor;

    #[async_trait]
    impl TextExtractor for FakeExtractor {
        async fn extract_text(
            &self,
            path: &Path,
        ) -> std::result::Result<RawDocumentText, ExtractError> {
            let name = path.to_string_lossy();
            if name.contains("broken") {
                return Err(ExtractError::Read("corrupted stream".into()));
            }
            Ok(RawDocumentText {
                text: format!("Facture client Total: 100,00 MAD ({name})"),
                document_type: DocumentType::Pdf,
                metadata: serde_json::Map::new(),
            })
        }
    }

    fn analyzer() -> DocumentAnalyzer {
        DocumentAnalyzer::new(AnalysisConfig::default())
    }

    #[tokio::test]
    async fn test_supplier_invoice_end_to_end() {
        let text = "Facture N° A-2024/18 du 15/01/2024 \n \
                    Fournisseur : Société ATLAS NEGOCE, ICE: 001234567000089 \n \
                    Total HT: 1 000,00 MAD \n TVA 20%: 200,00 MAD \n Total TTC: 1 200,00 MAD";

        let analysis = analyzer()
            .process_document_text(text, DocumentType::Pdf, AnalysisOptions::default())
            .await;

        assert_eq!(analysis.financial_data.amount, 1200.0);
        assert_eq!(analysis.financial_data.vat.rate, 0.20);
        assert_eq!(analysis.financial_data.vat.amount, 200.0);
        assert_eq!(analysis.classification.direction, Direction::Incoming);
        assert!(analysis.confidence > 0.5);
        assert_eq!(analysis.currency_analysis.primary_currency, Currency::MAD);
        assert!(!analysis.has_foreign_currency);
    }

    #[tokio::test]
    async fn test_client_invoice_with_foreign_currency() {
        let text = "Invoice to client \n Total $500.00 \n Thank you for your business";

        let analysis = analyzer()
            .process_document_text(text, DocumentType::Pdf, AnalysisOptions::default())
            .await;

        assert_eq!(analysis.classification.direction, Direction::Outgoing);
        assert!(analysis.has_foreign_currency);

        let usd = analysis
            .currencies
            .iter()
            .find(|m| m.code == Currency::USD)
            .expect("USD mention");
        assert_eq!(usd.original_amount, 500.0);
        // 500 / 0.1003 MAD, rounded to 4 decimals.
        assert_eq!(usd.mad_equivalent, Some(4985.0449));
    }

    #[tokio::test]
    async fn test_empty_text_yields_defaults() {
        let analysis = analyzer()
            .process_document_text("", DocumentType::Unknown, AnalysisOptions::default())
            .await;

        assert_eq!(analysis.financial_data.amount, 0.0);
        assert_eq!(analysis.confidence, 0.0);
        assert_eq!(analysis.classification.direction, Direction::Unknown);
        assert!(analysis.currencies.is_empty());
        assert_eq!(analysis.currency_analysis.primary_currency, Currency::MAD);
        assert!(analysis.currency_analysis.reliable);
    }

    #[tokio::test]
    async fn test_batch_isolates_failures_and_reports_progress() {
        let analyzer = analyzer();
        let paths = vec![
            PathBuf::from("a.pdf"),
            PathBuf::from("broken.pdf"),
            PathBuf::from("c.pdf"),
        ];

        let mut progress: Vec<(usize, usize, usize)> = Vec::new();
        let outcome = analyzer
            .process_batch(&FakeExtractor, &paths, |done, total, failed| {
                progress.push((done, total, failed));
            })
            .await;

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].path, PathBuf::from("broken.pdf"));

        assert_eq!(progress, vec![(1, 3, 0), (2, 3, 1), (3, 3, 1)]);
    }

    #[tokio::test]
    async fn test_batch_preserves_input_order() {
        let analyzer = analyzer();
        let paths = vec![PathBuf::from("x.pdf"), PathBuf::from("y.pdf")];

        let outcome = analyzer
            .process_batch(&FakeExtractor, &paths, |_, _, _| {})
            .await;

        let recorded: Vec<_> = outcome
            .results
            .iter()
            .map(|r| r.file_path.clone().unwrap())
            .collect();
        assert_eq!(recorded, paths);
    }
}
