//! Invoice number, counterparty, and keyword extraction.

use crate::models::analysis::Companies;

use super::patterns::{BANK_DETAILS, COMPANY_NAME, INVOICE_NUM, PAYMENT_TERMS, TAX_ID};
use super::scan;

/// Financial vocabulary scanned for the keyword summary. The French term is
/// what gets reported.
const KEYWORD_PAIRS: &[(&str, &str)] = &[
    ("facture", "invoice"),
    ("avoir", "credit note"),
    ("devis", "quote"),
    ("commande", "order"),
    ("paiement", "payment"),
    ("livraison", "delivery"),
    ("total", "total"),
    ("tva", "vat"),
    ("remise", "discount"),
    ("achat", "purchase"),
    ("vente", "sale"),
    ("client", "customer"),
    ("fournisseur", "supplier"),
    ("montant", "amount"),
];

/// First invoice-number match, if any.
pub fn find_invoice_number(text: &str) -> Option<String> {
    scan(&INVOICE_NUM, 0, text)
        .into_iter()
        .next()
        .map(|m| m.value)
}

/// All company names and tax identifiers, in document order, no dedup.
pub fn extract_companies(text: &str) -> Companies {
    Companies {
        names: scan(&COMPANY_NAME, 0, text)
            .into_iter()
            .map(|m| m.value.trim().to_string())
            .collect(),
        tax_ids: scan(&TAX_ID, 0, text).into_iter().map(|m| m.value).collect(),
    }
}

/// Financial keywords present in the text, reported in French.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    KEYWORD_PAIRS
        .iter()
        .filter(|(fr, en)| lower.contains(fr) || lower.contains(en))
        .map(|(fr, _)| fr.to_string())
        .collect()
}

/// First payment-terms match, trimmed.
pub fn find_payment_terms(text: &str) -> Option<String> {
    scan(&PAYMENT_TERMS, 0, text)
        .into_iter()
        .next()
        .map(|m| m.value.trim().to_string())
}

/// First bank-account reference (RIB/IBAN).
pub fn find_bank_details(text: &str) -> Option<String> {
    scan(&BANK_DETAILS, 0, text)
        .into_iter()
        .next()
        .map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_invoice_number() {
        assert_eq!(
            find_invoice_number("Facture N° FAC-2024/001 du 15/01/2024"),
            Some("FAC-2024/001".to_string())
        );
        assert_eq!(find_invoice_number("rien ici"), None);
    }

    #[test]
    fn test_extract_companies() {
        let text = "Société ATLAS TRADING, ICE: 001234567000089, IF 40112233";
        let companies = extract_companies(text);
        assert_eq!(companies.names, vec!["ATLAS TRADING".to_string()]);
        assert_eq!(
            companies.tax_ids,
            vec!["001234567000089".to_string(), "40112233".to_string()]
        );
    }

    #[test]
    fn test_extract_keywords_bilingual() {
        let keywords = extract_keywords("Invoice total with VAT for the customer");
        assert!(keywords.contains(&"facture".to_string()));
        assert!(keywords.contains(&"total".to_string()));
        assert!(keywords.contains(&"tva".to_string()));
        assert!(keywords.contains(&"client".to_string()));
    }

    #[test]
    fn test_payment_terms() {
        assert_eq!(
            find_payment_terms("Paiement : 30 jours fin de mois"),
            Some("30 jours fin de mois".to_string())
        );
    }

    #[test]
    fn test_bank_details() {
        assert_eq!(
            find_bank_details("RIB: 011780000012345678901234"),
            Some("011780000012345678901234".to_string())
        );
    }
}
