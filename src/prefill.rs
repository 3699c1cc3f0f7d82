//! Handoff from a confirmed scan to the card entry form.

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    card::{detect_brand, format_grouped, limit_for_brand, normalize_expiry, sanitize, CardBrand},
    scanner::DetectedCard,
};

/// Visual design a new card is saved with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum CardVariant {
    Midnight,
    Sunset,
    Jade,
}

impl CardVariant {
    pub const ALL: [CardVariant; 3] = [CardVariant::Midnight, CardVariant::Sunset, CardVariant::Jade];
}

/// Picks a design for each new card, never the same one twice in a row.
///
/// The caller owns the picker, so "last variant" lives as long as the
/// caller wants it to.
#[derive(Debug, Clone, Default)]
pub struct VariantPicker {
    last: Option<CardVariant>,
}

impl VariantPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<CardVariant> {
        self.last
    }

    pub fn pick(&mut self) -> CardVariant {
        self.pick_with(&mut rand::thread_rng())
    }

    pub fn pick_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> CardVariant {
        let pool: Vec<CardVariant> = CardVariant::ALL
            .iter()
            .copied()
            .filter(|variant| Some(*variant) != self.last)
            .collect();
        let options: &[CardVariant] = if pool.is_empty() { &CardVariant::ALL } else { &pool };

        let variant = options
            .choose(rng)
            .copied()
            .unwrap_or(CardVariant::Midnight);
        self.last = Some(variant);
        variant
    }
}

/// Values the entry form is opened with.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardPrefill {
    pub number: String,
    pub formatted_number: String,
    pub brand: CardBrand,
    pub expiry: Option<String>,
    pub variant: CardVariant,
}

impl CardPrefill {
    pub fn from_detection(detection: &DetectedCard, picker: &mut VariantPicker) -> Self {
        let digits = sanitize(&detection.number);
        let brand = detect_brand(&digits);
        let number = limit_for_brand(&digits, brand);

        Self {
            formatted_number: format_grouped(&number, brand),
            number,
            brand,
            expiry: detection.expiry.as_deref().and_then(normalize_expiry),
            variant: picker.pick(),
        }
    }
}
