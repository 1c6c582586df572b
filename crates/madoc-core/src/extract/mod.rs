//! Financial field extraction from normalized document text.

pub mod rules;

use tracing::{debug, info};

use crate::models::analysis::{Direction, FinancialData};

use rules::fields::{find_bank_details, find_payment_terms};
use rules::{
    extract_companies, extract_keywords, find_document_date, find_invoice_number,
    find_total_amount, find_vat_info,
};

/// Flat keyword vote used for the extractor's direction pre-pass. The
/// tiered scoring lives in the classifier; this is only a coarse first
/// signal that the classifier may adopt.
const INCOMING_HINTS: &[&str] = &[
    "fournisseur",
    "supplier",
    "nous avons acheté",
    "we purchased",
    "achat",
    "purchase",
    "bon de commande",
    "order",
    "bon de reception",
];

const OUTGOING_HINTS: &[&str] = &[
    "client",
    "customer",
    "nous avons vendu",
    "we sold",
    "vente",
    "sale",
    "prestation",
    "service provided",
    "bon de livraison",
];

/// Number of target fields feeding the confidence fraction.
const TARGET_FIELDS: f64 = 6.0;

/// Rule-based financial data extractor.
pub struct FinancialExtractor {
    default_vat_rate: f64,
}

impl FinancialExtractor {
    /// Create an extractor with the Moroccan default VAT rate.
    pub fn new() -> Self {
        Self { default_vat_rate: 0.20 }
    }

    /// Override the VAT rate assumed when none is parsed.
    pub fn with_default_vat_rate(mut self, rate: f64) -> Self {
        self.default_vat_rate = rate;
        self
    }

    /// Extract all financial fields from normalized text.
    ///
    /// Never fails: missing or malformed fields yield their zero/None
    /// defaults, and the confidence fraction reflects what was found.
    pub fn extract(&self, text: &str) -> FinancialData {
        debug!(text_len = text.len(), "extracting financial data");

        let mut data = FinancialData {
            amount: find_total_amount(text),
            vat: find_vat_info(text, self.default_vat_rate),
            date: find_document_date(text),
            invoice_number: find_invoice_number(text),
            direction: direction_hint(text),
            companies: extract_companies(text),
            confidence: 0.0,
            keywords: extract_keywords(text),
            payment_terms: find_payment_terms(text),
            bank_details: find_bank_details(text),
        };

        let mut fields_extracted = 0u32;
        fields_extracted += (data.amount > 0.0) as u32;
        fields_extracted += (data.vat.amount > 0.0) as u32;
        fields_extracted += data.date.is_some() as u32;
        fields_extracted += data.invoice_number.is_some() as u32;
        fields_extracted += (!data.companies.names.is_empty()) as u32;
        fields_extracted += (data.direction != Direction::Unknown) as u32;

        data.confidence = f64::from(fields_extracted) / TARGET_FIELDS;

        info!(
            amount = data.amount,
            confidence = data.confidence,
            "financial data extraction completed"
        );

        data
    }
}

impl Default for FinancialExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Coarse expense/revenue vote: one point per keyword present, ties are
/// unknown. The classifier refines or overrides this.
fn direction_hint(text: &str) -> Direction {
    let lower = text.to_lowercase();

    let incoming = INCOMING_HINTS.iter().filter(|k| lower.contains(*k)).count();
    let outgoing = OUTGOING_HINTS.iter().filter(|k| lower.contains(*k)).count();

    if incoming == outgoing {
        Direction::Unknown
    } else if incoming > outgoing {
        Direction::Incoming
    } else {
        Direction::Outgoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_supplier_invoice() {
        let text = "Facture N° FAC-2024/042 du 15/01/2024 \n \
                    Fournisseur : Société ATLAS TRADING, ICE: 001234567000089 \n \
                    Total HT: 1 000,00 MAD TVA 20%: 200,00 Total TTC: 1 200,00 MAD";

        let data = FinancialExtractor::new().extract(text);

        assert_eq!(data.amount, 1200.0);
        assert_eq!(data.vat.rate, 0.20);
        assert_eq!(data.vat.amount, 200.0);
        assert_eq!(data.date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(data.invoice_number.as_deref(), Some("FAC-2024/042"));
        assert_eq!(data.direction, Direction::Incoming);
        assert_eq!(data.companies.names, vec!["ATLAS TRADING".to_string()]);
        assert_eq!(data.confidence, 1.0);
    }

    #[test]
    fn test_extract_empty_text() {
        let data = FinancialExtractor::new().extract("");
        assert_eq!(data.amount, 0.0);
        assert_eq!(data.vat.amount, 0.0);
        assert_eq!(data.vat.rate, 0.20);
        assert_eq!(data.date, None);
        assert_eq!(data.direction, Direction::Unknown);
        assert_eq!(data.confidence, 0.0);
    }

    #[test]
    fn test_confidence_counts_populated_fields() {
        // Amount and direction only: 2 of 6 target fields.
        let data = FinancialExtractor::new().extract("achat total 500,00");
        assert_eq!(data.direction, Direction::Incoming);
        assert_eq!(data.amount, 500.0);
        assert_eq!(data.confidence, 2.0 / 6.0);
    }

    #[test]
    fn test_direction_hint_tie_is_unknown() {
        assert_eq!(direction_hint("le client et le fournisseur"), Direction::Unknown);
        assert_eq!(direction_hint("rien"), Direction::Unknown);
    }

    #[test]
    fn test_direction_hint_outgoing() {
        assert_eq!(direction_hint("vente de prestation au client"), Direction::Outgoing);
    }
}
