//! VAT rate and amount resolution.

use crate::models::analysis::VatInfo;

use super::patterns::{VAT_AMOUNT, VAT_RATE};
use super::{normalize_amount, scan};

/// Derive VAT information from document text.
///
/// The rate defaults to `default_rate` (the Moroccan standard 20%) when no
/// explicit percentage is present; an explicit percentage is converted to a
/// decimal fraction. The amount defaults to 0 when no VAT-tagged figure is
/// found.
pub fn find_vat_info(text: &str, default_rate: f64) -> VatInfo {
    let rate = scan(&VAT_RATE, 0, text)
        .first()
        .map(|m| parse_rate(&m.value) / 100.0)
        .unwrap_or(default_rate);

    let amount = scan(&VAT_AMOUNT, 0, text)
        .first()
        .map(|m| normalize_amount(&m.value))
        .unwrap_or(0.0);

    VatInfo { rate, amount }
}

/// Parse a percentage figure such as `20` or `7.5`.
///
/// A comma decimal is cut off rather than interpreted ("7,5" reads as 7):
/// best-effort behavior the rest of the pipeline expects.
fn parse_rate(s: &str) -> f64 {
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

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_explicit_rate() {
        let vat = find_vat_info("TVA 20%: 200,00 MAD", 0.20);
        assert_eq!(vat.rate, 0.20);
        assert_eq!(vat.amount, 200.0);
    }

    #[test]
    fn test_reduced_rate() {
        let vat = find_vat_info("TVA 10% : 50,00", 0.20);
        assert_eq!(vat.rate, 0.10);
        assert_eq!(vat.amount, 50.0);
    }

    #[test]
    fn test_prose_rate_without_amount() {
        // "TVA à 10%" carries a rate but the amount pattern does not reach
        // past the preposition.
        let vat = find_vat_info("TVA à 10% sur prestation", 0.20);
        assert_eq!(vat.rate, 0.10);
        assert_eq!(vat.amount, 0.0);
    }

    #[test]
    fn test_default_rate_when_absent() {
        let vat = find_vat_info("aucune mention de taxe", 0.20);
        assert_eq!(vat.rate, 0.20);
        assert_eq!(vat.amount, 0.0);
    }

    #[test]
    fn test_amount_without_rate() {
        let vat = find_vat_info("TVA : 340,00", 0.20);
        assert_eq!(vat.rate, 0.20);
        assert_eq!(vat.amount, 340.0);
    }

    #[test]
    fn test_english_vat_label() {
        let vat = find_vat_info("VAT 14% : 70.00", 0.20);
        assert_eq!(vat.rate, 0.14);
        assert_eq!(vat.amount, 70.0);
    }
}
