//! Supported currency catalog: codes, symbols, detection patterns, and
//! static fallback rates.
//!
//! The catalog is closed; amounts in any other currency are out of scope
//! for Moroccan tax reporting and are never detected or converted.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// ISO 4217 code of a supported currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    MAD,
    USD,
    EUR,
    GBP,
    CAD,
    CHF,
    JPY,
    CNY,
    AED,
    SAR,
}

impl Currency {
    /// All supported currencies, MAD first.
    pub const ALL: [Currency; 10] = [
        Currency::MAD,
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::CAD,
        Currency::CHF,
        Currency::JPY,
        Currency::CNY,
        Currency::AED,
        Currency::SAR,
    ];

    /// ISO code as a string.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::MAD => "MAD",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CAD => "CAD",
            Currency::CHF => "CHF",
            Currency::JPY => "JPY",
            Currency::CNY => "CNY",
            Currency::AED => "AED",
            Currency::SAR => "SAR",
        }
    }

    /// Human-readable currency name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Currency::MAD => "Moroccan Dirham",
            Currency::USD => "US Dollar",
            Currency::EUR => "Euro",
            Currency::GBP => "British Pound",
            Currency::CAD => "Canadian Dollar",
            Currency::CHF => "Swiss Franc",
            Currency::JPY => "Japanese Yen",
            Currency::CNY => "Chinese Yuan",
            Currency::AED => "UAE Dirham",
            Currency::SAR => "Saudi Riyal",
        }
    }

    /// Primary display symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::MAD => "د.م.",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::CAD => "C$",
            Currency::CHF => "Fr",
            Currency::JPY => "¥",
            Currency::CNY => "¥",
            Currency::AED => "د.إ",
            Currency::SAR => "ر.س",
        }
    }

    /// Minimum detection confidence for a mention to be considered reliable.
    ///
    /// MAD is held to the strictest threshold: its abbreviations ("Dh",
    /// "Dhs") collide with AED's and show up in free text more often than
    /// real symbols do.
    pub fn reliability_threshold(&self) -> f64 {
        match self {
            Currency::MAD => 0.95,
            Currency::USD | Currency::EUR | Currency::GBP => 0.9,
            _ => 0.85,
        }
    }

    /// Static fallback rate: value of 1 MAD in this currency.
    ///
    /// Finance Law 2025 reference figures, used whenever the rate provider
    /// is unavailable. MAD is the triangulation base and is always 1.0.
    pub fn default_rate(&self) -> f64 {
        match self {
            Currency::MAD => 1.0,
            Currency::USD => 0.1003,
            Currency::EUR => 0.0921,
            Currency::GBP => 0.0786,
            Currency::CAD => 0.1354,
            Currency::CHF => 0.0911,
            Currency::JPY => 15.2315,
            Currency::CNY => 0.6483,
            Currency::AED => 0.3683,
            Currency::SAR => 0.3762,
        }
    }

    /// Parse an ISO code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Currency> {
        let upper = code.trim().to_uppercase();
        Currency::ALL.iter().copied().find(|c| c.code() == upper)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s).ok_or_else(|| format!("unsupported currency code: {s}"))
    }
}

/// A complete rate table: value of 1 MAD in each currency.
pub type RateTable = HashMap<Currency, f64>;

/// The static fallback rate table.
pub fn default_rates() -> RateTable {
    Currency::ALL.iter().map(|c| (*c, c.default_rate())).collect()
}

/// Detection patterns for one currency.
///
/// Patterns are ranked: index 0 is the strictest (amount directly against a
/// symbol or code) and later indices are spelled-out variants. The rank
/// feeds the detection confidence score.
pub struct CurrencyPatterns {
    pub currency: Currency,
    /// Alternative symbol spellings checked for the symbol-clarity bonus.
    pub alt_symbols: &'static [&'static str],
    /// Ranked match patterns; group 1 always captures the amount.
    pub regexes: Vec<Regex>,
}

macro_rules! amount_patterns {
    ($symbols:literal, $words:literal) => {
        vec![
            Regex::new(concat!(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:", $symbols, ")")).unwrap(),
            Regex::new(concat!(r"(?i)(?:", $symbols, r")\s*(\d+(?:[.,]\d+)?)")).unwrap(),
            Regex::new(concat!(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:", $words, ")")).unwrap(),
            Regex::new(concat!(r"(?i)(?:", $words, r")\s*(\d+(?:[.,]\d+)?)")).unwrap(),
        ]
    };
}

lazy_static! {
    /// The full detection catalog, in `Currency::ALL` order.
    pub static ref CURRENCY_CATALOG: Vec<CurrencyPatterns> = vec![
        CurrencyPatterns {
            currency: Currency::MAD,
            alt_symbols: &["Dh", "DH", "درهم", "Dhs", "MAD", "dh.", "د.م."],
            regexes: amount_patterns!(r"د\.م\.|Dh|DH|درهم|Dhs|MAD|dh\.", "dirhams|dirham"),
        },
        CurrencyPatterns {
            currency: Currency::USD,
            alt_symbols: &["US$", "USD", "Dollar", "Dollars", "US Dollars", "$"],
            regexes: amount_patterns!(r"\$|US\$|USD", "US dollars|US dollar|dollars|dollar"),
        },
        CurrencyPatterns {
            currency: Currency::EUR,
            alt_symbols: &["EUR", "Euro", "Euros", "€", "Eur"],
            regexes: amount_patterns!("€|EUR|Euro|Euros|Eur", "euros|euro"),
        },
        CurrencyPatterns {
            currency: Currency::GBP,
            alt_symbols: &["GBP", "Sterling", "Pounds", "UK Pounds", "UKP", "£"],
            regexes: amount_patterns!(
                "£|GBP|Pounds|Sterling",
                "pounds sterling|pound sterling|pounds|pound"
            ),
        },
        CurrencyPatterns {
            currency: Currency::CAD,
            alt_symbols: &["CAD", "Can$", "Canadian Dollar", "Canadian Dollars", "C$"],
            regexes: amount_patterns!(
                r"C\$|CAD|Can\$",
                "Canadian dollars|Canadian dollar"
            ),
        },
        CurrencyPatterns {
            currency: Currency::CHF,
            alt_symbols: &["CHF", "Fr.", "SFr", "Swiss Franc", "Swiss Francs", "Fr"],
            regexes: amount_patterns!(r"CHF|Fr\.|SFr|Fr", "Swiss francs|Swiss franc"),
        },
        CurrencyPatterns {
            currency: Currency::JPY,
            alt_symbols: &["JPY", "JP¥", "Yen", "円", "¥"],
            regexes: amount_patterns!("¥|JPY|JP¥|Yen|円", "Japanese yen"),
        },
        CurrencyPatterns {
            currency: Currency::CNY,
            alt_symbols: &["CNY", "CN¥", "Yuan", "RMB", "元"],
            regexes: amount_patterns!("CNY|CN¥|Yuan|RMB|元", "Chinese yuan|Renminbi"),
        },
        CurrencyPatterns {
            currency: Currency::AED,
            alt_symbols: &["AED", "Dhs", "UAE Dirham", "Emirati Dirham", "د.إ"],
            regexes: amount_patterns!(r"د\.إ|AED|Dhs", "UAE dirham|Emirati dirham"),
        },
        CurrencyPatterns {
            currency: Currency::SAR,
            alt_symbols: &["SAR", "SR", "Saudi Riyal", "ر.س"],
            regexes: amount_patterns!(r"ر\.س|SAR|SR", "Saudi riyal|riyals"),
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("MAD"), Some(Currency::MAD));
        assert_eq!(Currency::from_code("usd"), Some(Currency::USD));
        assert_eq!(Currency::from_code(" eur "), Some(Currency::EUR));
        assert_eq!(Currency::from_code("XXX"), None);
    }

    #[test]
    fn test_default_rates_complete() {
        let rates = default_rates();
        assert_eq!(rates.len(), Currency::ALL.len());
        assert_eq!(rates[&Currency::MAD], 1.0);
    }

    #[test]
    fn test_catalog_covers_all_currencies() {
        assert_eq!(CURRENCY_CATALOG.len(), Currency::ALL.len());
        for (entry, currency) in CURRENCY_CATALOG.iter().zip(Currency::ALL) {
            assert_eq!(entry.currency, currency);
            assert_eq!(entry.regexes.len(), 4);
        }
    }

    #[test]
    fn test_symbol_patterns_capture_amount() {
        let mad = &CURRENCY_CATALOG[0];
        let caps = mad.regexes[0].captures("Total 1200,00 MAD").unwrap();
        assert_eq!(&caps[1], "1200,00");

        let caps = mad.regexes[1].captures("MAD 350").unwrap();
        assert_eq!(&caps[1], "350");
    }
}
