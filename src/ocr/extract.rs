use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::RecognizedText;
use crate::card::{looks_like_card_number, sanitize};

/// Runs of 15 or 16 digits inside an already sanitized string.
const DIGIT_RUN_PATTERN: &str = r"\d{15,16}";

/// Month 1-12 (optionally zero padded), a slash, then a 4 or 2 digit year.
/// The 4 digit alternative comes first so `08/2027` keeps the full year.
/// Neither side may run into neighbouring digits, and the month may not
/// follow a slash, so `13/27` and the tail of `31/12/2024` are rejected.
const EXPIRY_PATTERN: &str = r"(?i)(?:^|[^\d/])(0?[1-9]|1[0-2])\s*/\s*(\d{4}|\d{2})(?:\D|$)";

/// Best candidates found in one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedCardData {
    pub number: Option<String>,
    pub expiry: Option<String>,
}

impl ExtractedCardData {
    pub fn is_empty(&self) -> bool {
        self.number.is_none() && self.expiry.is_none()
    }
}

fn digit_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DIGIT_RUN_PATTERN).expect("digit run pattern is valid"))
}

fn expiry_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EXPIRY_PATTERN).expect("expiry pattern is valid"))
}

/// Walks the recognized segments and picks the first plausible number and expiry.
///
/// Stops as soon as both are found.
pub fn extract_card_data(result: Option<&RecognizedText>) -> ExtractedCardData {
    let Some(result) = result else {
        return ExtractedCardData::default();
    };

    let mut extracted = ExtractedCardData::default();
    for segment in result.segments() {
        if extracted.number.is_none() {
            extracted.number = find_digits_in_text(segment);
        }
        if extracted.expiry.is_none() {
            extracted.expiry = find_expiry_in_text(segment);
        }
        if extracted.number.is_some() && extracted.expiry.is_some() {
            break;
        }
    }

    extracted
}

/// Returns the first 15/16 digit run of `text` that looks like a card number.
///
/// Separators are dropped before matching, so `4111 1111 1111 4248` is one run.
pub fn find_digits_in_text(text: &str) -> Option<String> {
    let digits = sanitize(text);
    if digits.is_empty() {
        return None;
    }

    digit_run_regex()
        .find_iter(&digits)
        .map(|m| m.as_str())
        .find(|candidate| looks_like_card_number(candidate))
        .map(str::to_string)
}

/// Returns the first expiry in `text`, normalized to `MM/YY`.
pub fn find_expiry_in_text(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    let caps = expiry_regex().captures(text)?;
    let month = caps.get(1)?.as_str();
    let year = caps.get(2)?.as_str();
    let year = &year[year.len() - 2..];

    Some(format!("{month:0>2}/{year}"))
}
