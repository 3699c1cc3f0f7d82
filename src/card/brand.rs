use serde::{Deserialize, Serialize};

const AMEX_MAX_DIGITS: usize = 15;
const DEFAULT_MAX_DIGITS: usize = 16;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Other,
}

impl Default for CardBrand {
    fn default() -> Self {
        CardBrand::Other
    }
}

impl CardBrand {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardBrand::Visa => "VISA",
            CardBrand::Mastercard => "MASTERCARD",
            CardBrand::Amex => "AMEX",
            CardBrand::Discover => "DISCOVER",
            CardBrand::Other => "OTHER",
        }
    }

    /// Maximum number of digits a number of this brand may carry.
    pub fn max_digits(&self) -> usize {
        match self {
            CardBrand::Amex => AMEX_MAX_DIGITS,
            _ => DEFAULT_MAX_DIGITS,
        }
    }
}

/// Detects the brand from the leading digit only.
///
/// Deliberately coarse: no 34/37 split for Amex and no Discover range checks.
pub fn detect_brand(digits: &str) -> CardBrand {
    match digits.chars().next() {
        Some('3') => CardBrand::Amex,
        Some('4') => CardBrand::Visa,
        Some('5') => CardBrand::Mastercard,
        Some('6') => CardBrand::Discover,
        _ => CardBrand::Other,
    }
}

/// Truncates `digits` to the brand's maximum length (15 for Amex, 16 otherwise).
pub fn limit_for_brand(digits: &str, brand: CardBrand) -> String {
    digits.chars().take(brand.max_digits()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_brand_uses_first_digit() {
        assert_eq!(detect_brand("4111111111114242"), CardBrand::Visa);
        assert_eq!(detect_brand("5555444433331111"), CardBrand::Mastercard);
        assert_eq!(detect_brand("378282246310005"), CardBrand::Amex);
        assert_eq!(detect_brand("6011111111111117"), CardBrand::Discover);
        assert_eq!(detect_brand("9111111111111111"), CardBrand::Other);
    }

    #[test]
    fn test_detect_brand_ignores_everything_after_first_char() {
        for first in ['3', '4', '5', '6', '7', '0'] {
            let expected = detect_brand(&first.to_string());
            for tail in ["", "0", "99999", "abc", "4111 1111"] {
                let input = format!("{first}{tail}");
                assert_eq!(detect_brand(&input), expected, "input {input:?}");
            }
        }
    }

    #[test]
    fn test_detect_brand_empty_is_other() {
        assert_eq!(detect_brand(""), CardBrand::Other);
    }

    #[test]
    fn test_limit_for_brand() {
        let long = "3782822463100051234";
        assert_eq!(limit_for_brand(long, CardBrand::Amex), "378282246310005");
        assert_eq!(
            limit_for_brand("41111111111142429999", CardBrand::Visa),
            "4111111111114242"
        );
        assert_eq!(limit_for_brand("4111", CardBrand::Visa), "4111");
    }

    #[test]
    fn test_brand_serializes_upper_case() {
        let json = serde_json::to_string(&CardBrand::Mastercard).unwrap();
        assert_eq!(json, "\"MASTERCARD\"");
        assert_eq!(CardBrand::Mastercard.as_str(), "MASTERCARD");
    }
}
