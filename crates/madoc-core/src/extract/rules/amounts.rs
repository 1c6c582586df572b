//! Amount extraction and locale-ambiguous numeric normalization.

use super::patterns::{AMOUNT, TOTAL_KEYWORDS};
use super::{scan, FieldExtractor, FieldMatch};

/// Amount field extractor over the generic amount pattern.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = (FieldMatch, f64);

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        scan(&AMOUNT, 0, text)
            .into_iter()
            .map(|m| {
                let amount = normalize_amount(&m.value);
                (m, amount)
            })
            .collect()
    }
}

/// Resolve an ambiguous decimal/thousands-separator amount into a float.
///
/// Best-effort, not a locale-aware parser: the separator closest to the end
/// of the string (within 3 characters) is taken as the decimal mark, which
/// disambiguates `1.234,56` (European) from `1,234.56` (US). Inputs with
/// only commas treat each comma as a decimal point. Unparseable input
/// yields 0.0; this function never fails.
pub fn normalize_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    let len = cleaned.len() as i64;
    let last_dot = cleaned.rfind('.').map_or(-1, |i| i as i64);
    let last_comma = cleaned.rfind(',').map_or(-1, |i| i as i64);

    let normalized = if last_comma > last_dot && last_comma > len - 4 {
        // European format: 1.234,56
        cleaned.replace('.', "").replace(',', ".")
    } else if last_dot > last_comma && last_dot > len - 4 {
        // US format: 1,234.56
        cleaned.replace(',', "")
    } else if last_comma >= 0 && last_dot < 0 {
        // Only commas: treat each as a decimal point
        cleaned.replace(',', ".")
    } else {
        cleaned
    };

    parse_float_prefix(&normalized)
}

/// Parse the longest leading float prefix of `s`, 0.0 when there is none.
///
/// Keeps degraded inputs like `1.2.3` from erroring out: the scan stops at
/// the second decimal point and yields 1.2.
fn parse_float_prefix(s: &str) -> f64 {
    let mut end = 0;
    let mut seen_dot = false;

    for (i, c) in s.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '.' if !seen_dot => {
                seen_dot = true;
                end = i + 1;
            }
            _ => break,
        }
    }

    s[..end].parse().unwrap_or(0.0)
}

/// Find the most likely total amount in a document.
///
/// Keyword-tagged figures win: the largest amount mentioned next to a
/// total/montant keyword is usually the final total after subtotals. When
/// no tagged figure exists, the maximum over all amount-like tokens is
/// returned instead. That fallback is a known source of false positives
/// (a tax-ID digit run can be read as an amount) and downstream consumers
/// depend on it staying this way.
pub fn find_total_amount(text: &str) -> f64 {
    let tagged = scan(&TOTAL_KEYWORDS, 0, text);

    let pool = if tagged.is_empty() {
        scan(&AMOUNT, 0, text)
    } else {
        tagged
    };

    pool.iter()
        .map(|m| normalize_amount(&m.value))
        .fold(0.0, f64::max)
}
