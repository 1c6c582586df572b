//! Common regex patterns for Moroccan financial documents.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Amount patterns: 1,234.56 / 1.234,56 / 1 234,56 / bare integers,
    // with an optional trailing currency marker.
    pub static ref AMOUNT: Regex = Regex::new(
        r"(?i)(\b\d{1,3}(?:[ .,]\d{3})*(?:[ .,]\d{2})?\b|\b\d+(?:[ .,]\d{2})?\b)(?:\s*(?:MAD|DH|DHs|د\.م\.|\$|USD|EUR|€|Dhs))?"
    ).unwrap();

    // Amounts tagged by a total/montant keyword. The largest of these wins.
    pub static ref TOTAL_KEYWORDS: Regex = Regex::new(
        r"(?i)(?:total|montant|amount|somme)(?:\s+(?:ht|ttc|tva incluse|net))?\s*(?::)?\s*(\d{1,3}(?:[ .,]\d{3})*(?:[ .,]\d{2})?\b|\b\d+(?:[ .,]\d{2})?\b)"
    ).unwrap();

    // VAT patterns (Moroccan standard rate is 20%).
    pub static ref VAT_AMOUNT: Regex = Regex::new(
        r"(?i)(?:TVA|VAT|T\.V\.A\.|ض\.ق\.م\.)\s*(?:\d{1,2}(?:[,.]\d{1,2})?%)?(?:\s*:)?\s*(\d{1,3}(?:[ .,]\d{3})*(?:[ .,]\d{2})?\b|\b\d+(?:[ .,]\d{2})?\b)"
    ).unwrap();

    pub static ref VAT_RATE: Regex = Regex::new(
        r"(?i)(?:TVA|VAT|T\.V\.A\.|ض\.ق\.م\.)\s*(?:à|at|de|of)?\s*(\d{1,2}(?:[,.]\d{1,2})?)(?:\s*%)"
    ).unwrap();

    // Numeric and spelled-out dates, French and English month names.
    pub static ref DATE: Regex = Regex::new(
        r"(?i)\b(\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{1,2}\s+(?:janvier|février|mars|avril|mai|juin|juillet|août|septembre|octobre|novembre|décembre|jan|fév|mar|avr|jun|jul|aoû|sep|oct|nov|déc|january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{2,4})\b"
    ).unwrap();

    // Invoice number patterns.
    pub static ref INVOICE_NUM: Regex = Regex::new(
        r"(?i)(?:(?:N°|N|#|Nr|Reference|Ref)(?:\.?\s*):?\s*|facture(?:\s+n°|:)\s*)([A-Z0-9][-A-Z0-9/]{3,25})"
    ).unwrap();

    // Moroccan tax identifiers (IF, ICE, RC, PATENTE, TP).
    pub static ref TAX_ID: Regex = Regex::new(
        r"(?i)(?:IF|ICE|RC|PATENTE|TP|I\.F\.|identifiant\s+fiscal)(?:\.?\s*:?\s*)([0-9]{1,15})"
    ).unwrap();

    // Company names introduced by a legal form.
    pub static ref COMPANY_NAME: Regex = Regex::new(
        r"(?i)(?:société|company|entreprise|s\.a\.r\.l|sarl|s\.a|sa)\s+([A-Za-z0-9\s]{3,50})"
    ).unwrap();

    // Document-type vocabulary.
    pub static ref DOCUMENT_TYPE_KEYWORD: Regex = Regex::new(
        r"(?i)facture|invoice|credit note|debit note|delivery note|bon de livraison|avoir|note de débit|devis|quotation|pro\s*forma"
    ).unwrap();

    // Payment terms.
    pub static ref PAYMENT_TERMS: Regex = Regex::new(
        r"(?i)(?:payment|paiement)(?:\s+(?:terms|conditions|délai))?\s*(?::)?\s*(.{5,50})"
    ).unwrap();

    // Bank account details (RIB/IBAN).
    pub static ref BANK_DETAILS: Regex = Regex::new(
        r"(?i)(?:rib|iban|account|compte)(?:\s+(?:number|bancaire|banque))?\s*(?::)?\s*([A-Z0-9]{10,30})"
    ).unwrap();

    // Form-field structure used by the direction classifier.
    pub static ref CLIENT_FIELD: Regex = Regex::new(
        r"(?i)(?:client|customer)\s*:\s*([^\n]{3,40})"
    ).unwrap();

    pub static ref SUPPLIER_FIELD: Regex = Regex::new(
        r"(?i)(?:fournisseur|supplier)\s*:\s*([^\n]{3,40})"
    ).unwrap();

    // Seller/buyer ICE identifiers; the party issuing the invoice places
    // its own ICE first.
    pub static ref ICE_SELLER: Regex = Regex::new(
        r"(?i)ice\s+vendeur\s*:\s*([0-9]{15})"
    ).unwrap();

    pub static ref ICE_BUYER: Regex = Regex::new(
        r"(?i)ice\s+acheteur\s*:\s*([0-9]{15})"
    ).unwrap();

    // Tax vocabulary hint used by currency detection context scoring.
    pub static ref TAX_VOCABULARY: Regex = Regex::new(
        r"(?i)tax\s*id|tax\s*number|vat\s*number|ice|rc|if"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_pattern() {
        let caps = AMOUNT.captures("Prix: 1 234,56 MAD").unwrap();
        assert_eq!(&caps[1], "1 234,56");
    }

    #[test]
    fn test_total_keywords_pattern() {
        let caps = TOTAL_KEYWORDS.captures("Total TTC : 1 200,00").unwrap();
        assert_eq!(&caps[1], "1 200,00");

        let caps = TOTAL_KEYWORDS.captures("Montant net 840.50").unwrap();
        assert_eq!(&caps[1], "840.50");
    }

    #[test]
    fn test_vat_patterns() {
        let caps = VAT_RATE.captures("TVA 20% incluse").unwrap();
        assert_eq!(&caps[1], "20");

        let caps = VAT_AMOUNT.captures("TVA 20%: 200,00").unwrap();
        assert_eq!(&caps[1], "200,00");
    }

    #[test]
    fn test_invoice_number_pattern() {
        let caps = INVOICE_NUM.captures("Facture N° : FAC-2024/001").unwrap();
        assert_eq!(&caps[1], "FAC-2024/001");
    }

    #[test]
    fn test_tax_id_pattern() {
        let caps = TAX_ID.captures("ICE: 001234567000089").unwrap();
        assert_eq!(&caps[1], "001234567000089");
    }

    #[test]
    fn test_ice_party_patterns() {
        let text = "ICE vendeur : 001234567000089 ICE acheteur : 009876543000021";
        assert!(ICE_SELLER.is_match(text));
        assert!(ICE_BUYER.is_match(text));
    }
}
