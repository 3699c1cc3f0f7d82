//! Multi-frame confirmation of OCR candidates.
//!
//! A value is only trusted once the same reading shows up in
//! `threshold` consecutive non-blank observations. A blank observation
//! drops whatever was forming; a different value starts over at one hit.

use serde::Serialize;

use crate::ocr::ExtractedCardData;

pub const DEFAULT_MIN_STABLE_MATCHES: u32 = 2;

/// Rolling candidate for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilizationBuffer {
    pub value: String,
    pub hits: u32,
}

impl StabilizationBuffer {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            hits: 1,
        }
    }
}

/// Pure transition for one observation.
///
/// `None` and `Some("")` both count as a blank read and clear the buffer.
pub fn observe(
    buffer: Option<StabilizationBuffer>,
    candidate: Option<&str>,
    threshold: u32,
) -> (Option<StabilizationBuffer>, bool) {
    let Some(candidate) = candidate.filter(|value| !value.is_empty()) else {
        return (None, false);
    };

    let next = match buffer {
        Some(mut current) if current.value == candidate => {
            current.hits = current.hits.saturating_add(1);
            current
        }
        _ => StabilizationBuffer::new(candidate),
    };

    let confirmed = next.hits >= threshold;
    (Some(next), confirmed)
}

/// One tracked field. Freezes once confirmed until [`FieldStabilizer::reset`].
#[derive(Debug, Clone)]
pub struct FieldStabilizer {
    buffer: Option<StabilizationBuffer>,
    confirmed: Option<String>,
    threshold: u32,
}

impl FieldStabilizer {
    pub fn new(threshold: u32) -> Self {
        Self {
            buffer: None,
            confirmed: None,
            threshold: threshold.max(1),
        }
    }

    /// Feeds one observation. Returns true only on the observation that confirms.
    pub fn observe(&mut self, candidate: Option<&str>) -> bool {
        if self.confirmed.is_some() {
            return false;
        }

        let (buffer, confirmed) = observe(self.buffer.take(), candidate, self.threshold);
        if confirmed {
            self.confirmed = buffer.as_ref().map(|b| b.value.clone());
        }
        self.buffer = buffer;
        confirmed
    }

    pub fn confirmed(&self) -> Option<&str> {
        self.confirmed.as_deref()
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed.is_some()
    }

    pub fn buffer(&self) -> Option<&StabilizationBuffer> {
        self.buffer.as_ref()
    }

    pub fn hits(&self) -> u32 {
        self.buffer.as_ref().map(|b| b.hits).unwrap_or(0)
    }

    /// `min(hits, threshold) / threshold`, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        f64::from(self.hits().min(self.threshold)) / f64::from(self.threshold)
    }

    pub fn reset(&mut self) {
        self.buffer = None;
        self.confirmed = None;
    }
}

/// What changed on a single [`CardStabilizer::observe`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StabilizeOutcome {
    pub number_confirmed: bool,
    pub expiry_confirmed: bool,
}

/// Number and expiry stabilized independently under one threshold.
#[derive(Debug, Clone)]
pub struct CardStabilizer {
    number: FieldStabilizer,
    expiry: FieldStabilizer,
}

impl Default for CardStabilizer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_STABLE_MATCHES)
    }
}

impl CardStabilizer {
    pub fn new(threshold: u32) -> Self {
        Self {
            number: FieldStabilizer::new(threshold),
            expiry: FieldStabilizer::new(threshold),
        }
    }

    pub fn observe(&mut self, extracted: &ExtractedCardData) -> StabilizeOutcome {
        StabilizeOutcome {
            number_confirmed: self.number.observe(extracted.number.as_deref()),
            expiry_confirmed: self.expiry.observe(extracted.expiry.as_deref()),
        }
    }

    pub fn number(&self) -> &FieldStabilizer {
        &self.number
    }

    pub fn expiry(&self) -> &FieldStabilizer {
        &self.expiry
    }

    pub fn confirmed_number(&self) -> Option<&str> {
        self.number.confirmed()
    }

    pub fn confirmed_expiry(&self) -> Option<&str> {
        self.expiry.confirmed()
    }

    pub fn number_progress(&self) -> f64 {
        self.number.progress()
    }

    pub fn reset(&mut self) {
        self.number.reset();
        self.expiry.reset();
    }
}
