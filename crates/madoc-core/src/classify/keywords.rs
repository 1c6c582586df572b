//! Weighted keyword vocabulary for direction classification.
//!
//! Kept as data so the scoring logic never needs touching when the
//! vocabulary is tuned. All matching is case-insensitive substring search
//! over French and English terms.

/// Points per tier.
pub const STRONG_WEIGHT: u32 = 3;
pub const MEDIUM_WEIGHT: u32 = 2;
pub const WEAK_WEIGHT: u32 = 1;

/// Incoming (expense) vocabulary.
pub const INCOMING_STRONG: &[&str] = &[
    "fournisseur",
    "supplier",
    "achat",
    "purchase",
    "bon de commande",
    "purchase order",
    "nous vous devons",
    "we owe you",
    "achats",
    "purchases",
    "bon de reception",
    "à payer",
    "to pay",
    "créditeur",
    "creditor",
];

pub const INCOMING_MEDIUM: &[&str] = &[
    "livré par",
    "delivered by",
    "réception",
    "receipt",
    "charge",
    "expense",
    "dépense",
    "acheteur",
    "buyer",
    "note de frais",
    "expense report",
    "paiement au fournisseur",
    "supplier payment",
];

pub const INCOMING_WEAK: &[&str] = &[
    "reçu",
    "received",
    "entrée",
    "input",
    "imported",
    "importation",
];

/// Outgoing (revenue) vocabulary.
pub const OUTGOING_STRONG: &[&str] = &[
    "client",
    "customer",
    "vente",
    "sale",
    "vendu",
    "sold",
    "bon de livraison",
    "delivery note",
    "nous vous facturons",
    "we invoice you",
    "vous nous devez",
    "you owe us",
    "à recevoir",
    "to receive",
    "débiteur",
    "debtor",
];

pub const OUTGOING_MEDIUM: &[&str] = &[
    "livré à",
    "delivered to",
    "prestation",
    "service provided",
    "revenu",
    "revenue",
    "vendeur",
    "seller",
    "export",
    "exportation",
    "client payment",
    "paiement client",
];

pub const OUTGOING_WEAK: &[&str] = &["envoyé", "sent", "sortie", "output", "exported"];

/// Closing phrases that strengthen or settle a classification.
pub const INCOMING_PHRASES: &[&str] = &[
    "nous vous remercions pour votre commande",
    "thank you for your order",
    "bon de reception de marchandise",
];

pub const OUTGOING_PHRASES: &[&str] = &[
    "nous vous remercions pour votre confiance",
    "thank you for your business",
    "bon de livraison",
];
