//! Configuration for the analysis pipeline.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::currency::Currency;

/// Six hours, the lifetime of a current rate snapshot.
const DEFAULT_RATE_CACHE_TTL_MS: u64 = 6 * 60 * 60 * 1000;

/// Moroccan standard VAT rate.
const DEFAULT_VAT_RATE: f64 = 0.20;

/// Margin under which keyword classification is considered ambiguous.
const DEFAULT_TIE_MARGIN: f64 = 0.1;

/// Tunable knobs recognized by the analysis core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Per-currency overrides for the detection reliability threshold.
    pub confidence_thresholds: HashMap<Currency, f64>,

    /// Keyword-score margin below which direction is left unknown.
    pub classification_tie_margin: f64,

    /// Lifetime of the current exchange-rate snapshot, in milliseconds.
    pub rate_cache_ttl_ms: u64,

    /// VAT rate assumed when no explicit rate is parsed.
    pub default_vat_rate: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            confidence_thresholds: HashMap::new(),
            classification_tie_margin: DEFAULT_TIE_MARGIN,
            rate_cache_ttl_ms: DEFAULT_RATE_CACHE_TTL_MS,
            default_vat_rate: DEFAULT_VAT_RATE,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Reliability threshold for a currency, honoring overrides.
    pub fn threshold_for(&self, currency: Currency) -> f64 {
        self.confidence_thresholds
            .get(&currency)
            .copied()
            .unwrap_or_else(|| currency.reliability_threshold())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.classification_tie_margin, 0.1);
        assert_eq!(config.rate_cache_ttl_ms, 21_600_000);
        assert_eq!(config.default_vat_rate, 0.20);
        assert!(config.confidence_thresholds.is_empty());
    }

    #[test]
    fn test_threshold_override() {
        let mut config = AnalysisConfig::default();
        assert_eq!(config.threshold_for(Currency::MAD), 0.95);

        config.confidence_thresholds.insert(Currency::MAD, 0.8);
        assert_eq!(config.threshold_for(Currency::MAD), 0.8);
        assert_eq!(config.threshold_for(Currency::USD), 0.9);
    }

    #[test]
    fn test_partial_json_round_trip() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"classification_tie_margin": 0.2}"#).unwrap();
        assert_eq!(config.classification_tie_margin, 0.2);
        assert_eq!(config.default_vat_rate, 0.20);

        let json = serde_json::to_string(&config).unwrap();
        let back: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.classification_tie_margin, 0.2);
    }
}
