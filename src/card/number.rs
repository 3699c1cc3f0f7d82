use super::brand::{detect_brand, CardBrand};

const AMEX_GROUPS: [usize; 3] = [4, 6, 5];
const DEFAULT_GROUP_LEN: usize = 4;

/// Strips every character that is not an ASCII digit.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Formats a number for display: 4-6-5 for Amex, groups of four otherwise.
///
/// The input is sanitized first, so already-grouped text is accepted.
/// Amex digits past the 15th are dropped.
pub fn format_grouped(digits: &str, brand: CardBrand) -> String {
    let sanitized = sanitize(digits);
    if sanitized.is_empty() {
        return String::new();
    }

    let groups: Vec<&str> = match brand {
        CardBrand::Amex => {
            let mut groups = Vec::with_capacity(AMEX_GROUPS.len());
            let mut start = 0;
            for len in AMEX_GROUPS {
                if start >= sanitized.len() {
                    break;
                }
                let end = (start + len).min(sanitized.len());
                groups.push(&sanitized[start..end]);
                start = end;
            }
            groups
        }
        _ => sanitized
            .as_bytes()
            .chunks(DEFAULT_GROUP_LEN)
            // ASCII digits only, every chunk is valid UTF-8
            .filter_map(|chunk| std::str::from_utf8(chunk).ok())
            .collect(),
    };

    groups.join(" ")
}

/// Standard Luhn (mod 10) checksum.
///
/// Returns false for empty input or anything containing a non-digit.
pub fn passes_luhn(digits: &str) -> bool {
    if digits.is_empty() {
        return false;
    }

    let mut sum = 0u32;
    let mut should_double = false;

    for ch in digits.chars().rev() {
        let Some(mut digit) = ch.to_digit(10) else {
            return false;
        };

        if should_double {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }

        sum += digit;
        should_double = !should_double;
    }

    sum % 10 == 0
}

/// Plausibility gate for OCR candidates.
///
/// 15 digits must start with `3`, 16 digits with `4`, `5` or `6`; both must
/// pass Luhn. Every other length is rejected.
pub fn looks_like_card_number(digits: &str) -> bool {
    let sanitized = sanitize(digits);

    match sanitized.len() {
        15 => sanitized.starts_with('3') && passes_luhn(&sanitized),
        16 => sanitized.starts_with(&['4', '5', '6'][..]) && passes_luhn(&sanitized),
        _ => false,
    }
}

/// Detects the brand and formats in one go, as the detection preview does.
pub fn format_detected(digits: &str) -> String {
    format_grouped(digits, detect_brand(digits))
}
