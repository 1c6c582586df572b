//! Expense/revenue direction classification.
//!
//! A pure scoring function over already-extracted financial data and the
//! document text: weighted keyword tiers first, then structural heuristics
//! (form fields, ICE ordering) that can override the keyword verdict, then
//! closing-phrase boosts. Nothing is persisted between calls.

pub mod keywords;

use tracing::{debug, info};

use crate::extract::rules::patterns::{CLIENT_FIELD, ICE_BUYER, ICE_SELLER, SUPPLIER_FIELD};
use crate::models::analysis::{
    ClassificationMethod, ClassificationResult, Direction, FinancialData,
};

use keywords::*;

/// Confidence ceiling for every verdict.
const MAX_CONFIDENCE: f64 = 0.95;

/// Ceiling when adopting the extractor's direction pre-pass.
const FINANCIAL_DATA_CAP: f64 = 0.7;

/// Direction classifier with a configurable ambiguity margin.
pub struct DirectionClassifier {
    tie_margin: f64,
}

impl DirectionClassifier {
    /// Create a classifier with the default 0.1 ambiguity margin.
    pub fn new() -> Self {
        Self { tie_margin: 0.1 }
    }

    /// Override the margin under which keyword scores are ambiguous.
    pub fn with_tie_margin(mut self, margin: f64) -> Self {
        self.tie_margin = margin;
        self
    }

    /// Classify a document as incoming (expense) or outgoing (revenue).
    ///
    /// Never fails: ambiguity resolves to `Unknown` with the computed
    /// confidence, surfaced as data rather than an error.
    pub fn classify(&self, financial: &FinancialData, text: &str) -> ClassificationResult {
        debug!("classifying document direction");

        // An upstream direction verdict is adopted outright, with its
        // confidence capped.
        if financial.direction != Direction::Unknown {
            debug!(direction = ?financial.direction, "adopting extractor direction");
            return ClassificationResult {
                direction: financial.direction,
                confidence: financial.confidence.min(FINANCIAL_DATA_CAP),
                method: ClassificationMethod::FinancialData,
            };
        }

        let lower = text.to_lowercase();
        let (incoming_score, outgoing_score) = keyword_scores(&lower);

        let total = incoming_score + outgoing_score;
        let (incoming_confidence, outgoing_confidence) = if total > 0 {
            (
                f64::from(incoming_score) / f64::from(total),
                f64::from(outgoing_score) / f64::from(total),
            )
        } else {
            (0.0, 0.0)
        };

        let (mut direction, mut confidence) =
            if (incoming_confidence - outgoing_confidence).abs() < self.tie_margin {
                (
                    Direction::Unknown,
                    incoming_confidence.max(outgoing_confidence),
                )
            } else if incoming_confidence > outgoing_confidence {
                (Direction::Incoming, incoming_confidence)
            } else {
                (Direction::Outgoing, outgoing_confidence)
            };
        let mut method = ClassificationMethod::Keywords;

        // Form structure: a client field without a supplier field marks an
        // outgoing invoice, and vice versa.
        if lower.contains("facture") || lower.contains("invoice") {
            let has_client = CLIENT_FIELD.is_match(&lower);
            let has_supplier = SUPPLIER_FIELD.is_match(&lower);

            if has_client && !has_supplier {
                direction = Direction::Outgoing;
                confidence = confidence.max(0.8);
                method = ClassificationMethod::FormStructure;
            } else if has_supplier && !has_client {
                direction = Direction::Incoming;
                confidence = confidence.max(0.8);
                method = ClassificationMethod::FormStructure;
            }
        }

        // ICE ordering: the issuing company places its own identifier
        // first, so seller-ICE before buyer-ICE reads as our sales invoice.
        if let (Some(seller), Some(buyer)) =
            (ICE_SELLER.find(&lower), ICE_BUYER.find(&lower))
        {
            if seller.start() < buyer.start() {
                direction = Direction::Outgoing;
            } else {
                direction = Direction::Incoming;
            }
            confidence = confidence.max(0.85);
            method = ClassificationMethod::IceStructure;
        }

        // Closing phrases settle an unknown verdict or strengthen a
        // matching one.
        if INCOMING_PHRASES.iter().any(|p| lower.contains(p)) {
            if direction == Direction::Incoming {
                confidence += 0.1;
            } else if direction == Direction::Unknown {
                direction = Direction::Incoming;
                confidence = 0.7;
                method = ClassificationMethod::Phrasing;
            }
        }

        if OUTGOING_PHRASES.iter().any(|p| lower.contains(p)) {
            if direction == Direction::Outgoing {
                confidence += 0.1;
            } else if direction == Direction::Unknown {
                direction = Direction::Outgoing;
                confidence = 0.7;
                method = ClassificationMethod::Phrasing;
            }
        }

        confidence = confidence.min(MAX_CONFIDENCE);

        info!(?direction, confidence, ?method, "document classification completed");

        ClassificationResult {
            direction,
            confidence,
            method,
        }
    }
}

impl Default for DirectionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum tier weights for every vocabulary term present in the text.
fn keyword_scores(lower: &str) -> (u32, u32) {
    let score = |tiers: [(&[&str], u32); 3]| {
        tiers
            .iter()
            .map(|(terms, weight)| {
                terms.iter().filter(|t| lower.contains(*t)).count() as u32 * weight
            })
            .sum::<u32>()
    };

    let incoming = score([
        (INCOMING_STRONG, STRONG_WEIGHT),
        (INCOMING_MEDIUM, MEDIUM_WEIGHT),
        (INCOMING_WEAK, WEAK_WEIGHT),
    ]);
    let outgoing = score([
        (OUTGOING_STRONG, STRONG_WEIGHT),
        (OUTGOING_MEDIUM, MEDIUM_WEIGHT),
        (OUTGOING_WEAK, WEAK_WEIGHT),
    ]);

    (incoming, outgoing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unknown_financial() -> FinancialData {
        FinancialData::default()
    }

    #[test]
    fn test_adopts_extractor_direction_with_cap() {
        let financial = FinancialData {
            direction: Direction::Incoming,
            confidence: 1.0,
            ..FinancialData::default()
        };

        let result = DirectionClassifier::new().classify(&financial, "quelconque");
        assert_eq!(result.direction, Direction::Incoming);
        assert_eq!(result.confidence, 0.7);
        assert_eq!(result.method, ClassificationMethod::FinancialData);
    }

    #[test]
    fn test_keyword_classification_incoming() {
        let text = "Bon de commande envoyé au fournisseur pour achat de matériel";
        let result = DirectionClassifier::new().classify(&unknown_financial(), text);
        assert_eq!(result.direction, Direction::Incoming);
        assert_eq!(result.method, ClassificationMethod::Keywords);
        assert!(result.confidence > 0.5);
    }

    #[test]
    fn test_ambiguous_scores_are_unknown() {
        // "client" and "fournisseur" are both STRONG: 3 vs 3, margin 0 < 0.1.
        let text = "le fournisseur livre, le client paie";
        let result = DirectionClassifier::new().classify(&unknown_financial(), text);
        assert_eq!(result.direction, Direction::Unknown);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_no_keywords_is_unknown_zero() {
        let result = DirectionClassifier::new().classify(&unknown_financial(), "texte neutre");
        assert_eq!(result.direction, Direction::Unknown);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_form_structure_overrides_keywords() {
        // Supplier field present without client field flips the document to
        // incoming even though "client" never appears.
        let text = "Facture \n Fournisseur : ATLAS SARL \n Total: 100";
        let result = DirectionClassifier::new().classify(&unknown_financial(), text);
        assert_eq!(result.direction, Direction::Incoming);
        assert!(result.confidence >= 0.8);
        assert_eq!(result.method, ClassificationMethod::FormStructure);
    }

    #[test]
    fn test_ice_ordering_seller_first_is_outgoing() {
        let text = "Facture \n ICE vendeur : 001234567000089 \n ICE acheteur : 009876543000021";
        let result = DirectionClassifier::new().classify(&unknown_financial(), text);
        assert_eq!(result.direction, Direction::Outgoing);
        assert!(result.confidence >= 0.85);
        assert_eq!(result.method, ClassificationMethod::IceStructure);
    }

    #[test]
    fn test_ice_ordering_buyer_first_is_incoming() {
        let text = "ICE acheteur : 009876543000021 \n ICE vendeur : 001234567000089";
        let result = DirectionClassifier::new().classify(&unknown_financial(), text);
        assert_eq!(result.direction, Direction::Incoming);
        assert_eq!(result.method, ClassificationMethod::IceStructure);
    }

    #[test]
    fn test_phrase_settles_unknown() {
        let result = DirectionClassifier::new()
            .classify(&unknown_financial(), "Merci. Thank you for your order.");
        assert_eq!(result.direction, Direction::Incoming);
        assert_eq!(result.confidence, 0.7);
        assert_eq!(result.method, ClassificationMethod::Phrasing);
    }

    #[test]
    fn test_phrase_strengthens_agreement() {
        let text = "vente au client, prestation livrée. Thank you for your business.";
        let result = DirectionClassifier::new().classify(&unknown_financial(), text);
        assert_eq!(result.direction, Direction::Outgoing);
        // Keyword confidence 1.0 is capped at 0.95 after the +0.1 boost.
        assert_eq!(result.confidence, 0.95);
    }

    #[test]
    fn test_custom_tie_margin() {
        // 6 vs 4 normalizes to 0.6/0.4; |diff| = 0.2 < 0.3 margin.
        let text = "achat chez le fournisseur, revenu de prestation";
        let strict = DirectionClassifier::new().with_tie_margin(0.3);
        let result = strict.classify(&unknown_financial(), text);
        assert_eq!(result.direction, Direction::Unknown);
    }
}
