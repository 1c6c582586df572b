//! Rule-based field extractors for Moroccan financial documents.

pub mod patterns;

pub mod amounts;
pub mod dates;
pub mod fields;
pub mod vat;

pub use amounts::{find_total_amount, normalize_amount, AmountExtractor};
pub use dates::{find_document_date, DateExtractor};
pub use fields::{extract_companies, extract_keywords, find_invoice_number};
pub use vat::find_vat_info;

use regex::Regex;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// One regex hit for a field pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    /// The full matched span.
    pub raw: String,

    /// The captured group when the pattern has one, otherwise the full match.
    pub value: String,

    /// Byte offset of the match in the source text.
    pub position: usize,

    /// Index of the pattern that produced the match.
    pub pattern: usize,
}

/// Collect every non-overlapping match of `pattern` in a single pass.
///
/// Group 1 is taken as the value when present; patterns without a capture
/// group yield the full match.
pub fn scan(pattern: &Regex, pattern_index: usize, text: &str) -> Vec<FieldMatch> {
    pattern
        .captures_iter(text)
        .map(|caps| {
            let full = caps.get(0).expect("match group 0 always present");
            let value = caps.get(1).map_or(full.as_str(), |g| g.as_str());
            FieldMatch {
                raw: full.as_str().to_string(),
                value: value.to_string(),
                position: full.start(),
                pattern: pattern_index,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scan_prefers_capture_group() {
        let matches = scan(&patterns::TOTAL_KEYWORDS, 0, "Total: 100,00 puis total 50");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].value, "100,00");
        assert_eq!(matches[1].value, "50");
        assert!(matches[0].raw.starts_with("Total"));
    }

    #[test]
    fn test_scan_without_capture_group() {
        let matches = scan(&patterns::DOCUMENT_TYPE_KEYWORD, 0, "une facture et un devis");
        let values: Vec<&str> = matches.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, ["facture", "devis"]);
    }
}
