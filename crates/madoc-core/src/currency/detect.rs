//! Currency mention detection with confidence scoring.

use std::collections::HashMap;

use tracing::debug;

use crate::extract::rules::patterns::TAX_VOCABULARY;
use crate::models::analysis::{CurrencyAnalysis, CurrencyFrequency, CurrencyMention};
use crate::models::config::AnalysisConfig;

use super::catalog::{Currency, CurrencyPatterns, CURRENCY_CATALOG};

/// Pattern-rank base score: rank 0 scores highest, everything past rank 3
/// scores alike. The sum with context bonuses is capped at 1.0.
fn rank_base(rank: usize) -> f64 {
    0.7 + 0.1 * (4 - rank.min(3)) as f64
}

/// MAD keeps primacy when its aggregate score reaches this share of the
/// leader's (Moroccan context bias).
const MAD_BIAS_RATIO: f64 = 0.8;

/// Mentions of the primary currency must all clear this score for the
/// analysis to count as reliable.
const RELIABLE_FLOOR: f64 = 0.7;

/// Country/region and vocabulary hints scanned once per document.
struct ContextHints {
    morocco: bool,
    uae: bool,
    usa: bool,
    europe: bool,
    uk: bool,
    invoice_words: bool,
    payment_words: bool,
    has_tax_ids: bool,
}

impl ContextHints {
    fn from_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self {
            morocco: lower.contains("morocco") || lower.contains("maroc") || lower.contains("المغرب"),
            uae: lower.contains("uae") || lower.contains("emirates") || lower.contains("الإمارات"),
            usa: lower.contains("usa")
                || lower.contains("united states")
                || lower.contains("america"),
            europe: lower.contains("euro") || lower.contains("european union") || lower.contains("eu"),
            uk: lower.contains("uk") || lower.contains("united kingdom") || lower.contains("britain"),
            invoice_words: lower.contains("invoice")
                || lower.contains("facture")
                || lower.contains("فاتورة"),
            payment_words: lower.contains("payment")
                || lower.contains("paiement")
                || lower.contains("دفع"),
            has_tax_ids: TAX_VOCABULARY.is_match(&lower),
        }
    }

    /// Country bonus for a specific currency.
    fn country_bonus(&self, currency: Currency) -> f64 {
        let hit = match currency {
            Currency::MAD => self.morocco,
            Currency::USD => self.usa,
            Currency::EUR => self.europe,
            Currency::GBP => self.uk,
            Currency::AED => self.uae,
            _ => false,
        };
        if hit { 0.2 } else { 0.0 }
    }
}

/// Currency detector with per-currency reliability thresholds.
pub struct CurrencyDetector {
    thresholds: HashMap<Currency, f64>,
}

impl CurrencyDetector {
    /// Detector with the catalog's default thresholds.
    pub fn new() -> Self {
        Self {
            thresholds: HashMap::new(),
        }
    }

    /// Detector honoring the configured threshold overrides.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            thresholds: config.confidence_thresholds.clone(),
        }
    }

    fn threshold_for(&self, currency: Currency) -> f64 {
        self.thresholds
            .get(&currency)
            .copied()
            .unwrap_or_else(|| currency.reliability_threshold())
    }

    /// Find every currency mention in the text, sorted by position.
    ///
    /// Detection runs against raw (un-normalized) text so Arabic currency
    /// labels still match. The scan resumes one character past each match
    /// start rather than past its end; overlapping re-matches on short
    /// strings are an accepted trade-off of that loop-safety rule.
    pub fn detect(&self, text: &str) -> Vec<CurrencyMention> {
        if text.is_empty() {
            return Vec::new();
        }

        let hints = ContextHints::from_text(text);
        let mut mentions = Vec::new();

        for entry in CURRENCY_CATALOG.iter() {
            for (rank, regex) in entry.regexes.iter().enumerate() {
                let mut at = 0;
                while let Some(caps) = regex.captures_at(text, at) {
                    let full = caps.get(0).expect("match group 0 always present");

                    if let Ok(amount) = caps[1].replace(',', ".").parse::<f64>() {
                        let confidence = self.score(entry, rank, full.as_str(), &hints);
                        mentions.push(CurrencyMention {
                            code: entry.currency,
                            original_amount: amount,
                            position: full.start(),
                            match_length: full.as_str().len(),
                            matched_text: full.as_str().to_string(),
                            confidence,
                            is_reliable: confidence >= self.threshold_for(entry.currency),
                            mad_equivalent: None,
                            conversion_rate: None,
                        });
                    }

                    // Advance past the match start, not its end.
                    let step = text[full.start()..]
                        .chars()
                        .next()
                        .map_or(1, |c| c.len_utf8());
                    at = full.start() + step;
                    if at >= text.len() {
                        break;
                    }
                }
            }
        }

        mentions.sort_by_key(|m| m.position);
        debug!(count = mentions.len(), "currency detection completed");
        mentions
    }

    /// confidence = base(rank) + context bonus + symbol clarity, capped at 1.
    fn score(
        &self,
        entry: &CurrencyPatterns,
        rank: usize,
        matched: &str,
        hints: &ContextHints,
    ) -> f64 {
        let mut score = rank_base(rank);

        score += hints.country_bonus(entry.currency);
        if hints.invoice_words || hints.payment_words {
            score += 0.05;
        }
        if hints.has_tax_ids {
            score += 0.05;
        }

        let has_symbol = entry
            .alt_symbols
            .iter()
            .any(|s| matched.contains(s))
            || matched.contains(entry.currency.symbol());
        if has_symbol {
            score += 0.1;
        }

        score.min(1.0)
    }

    /// Pick the document's primary currency by mention count, then average
    /// confidence, with the Moroccan-context bias: MAD keeps primacy
    /// whenever its aggregate score is within 80% of the leader's.
    pub fn analyze(&self, mentions: &[CurrencyMention]) -> CurrencyAnalysis {
        if mentions.is_empty() {
            return CurrencyAnalysis::default();
        }

        let mut counts: HashMap<Currency, usize> = HashMap::new();
        let mut total_confidence: HashMap<Currency, f64> = HashMap::new();
        let mut order: Vec<Currency> = Vec::new();

        for mention in mentions {
            if !counts.contains_key(&mention.code) {
                order.push(mention.code);
            }
            *counts.entry(mention.code).or_insert(0) += 1;
            *total_confidence.entry(mention.code).or_insert(0.0) += mention.confidence;
        }

        let avg = |code: Currency| total_confidence[&code] / counts[&code] as f64;

        let mut primary = Currency::MAD;
        let mut highest_count = 0usize;
        let mut highest_avg = 0.0f64;

        for &code in &order {
            let count = counts[&code];
            let avg_confidence = avg(code);

            if count > highest_count || (count == highest_count && avg_confidence > highest_avg) {
                primary = code;
                highest_count = count;
                highest_avg = avg_confidence;
            }

            if code == Currency::MAD && primary != Currency::MAD {
                let primary_score = counts[&primary] as f64 * avg(primary);
                let mad_score = count as f64 * avg_confidence;
                if mad_score >= primary_score * MAD_BIAS_RATIO {
                    primary = Currency::MAD;
                }
            }
        }

        let reliable = mentions
            .iter()
            .filter(|m| m.code == primary)
            .all(|m| m.confidence > RELIABLE_FLOOR);

        let mut most_frequent: Vec<CurrencyFrequency> = order
            .iter()
            .map(|&code| CurrencyFrequency {
                code,
                count: counts[&code],
            })
            .collect();
        most_frequent.sort_by(|a, b| b.count.cmp(&a.count));

        CurrencyAnalysis {
            primary_currency: primary,
            reliable,
            currencies_found: order,
            most_frequent,
        }
    }
}

impl Default for CurrencyDetector {
    fn default() -> Self {
        Self::new()
    }
}
