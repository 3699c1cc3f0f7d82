use super::number::sanitize;

const MAX_INPUT_DIGITS: usize = 6;

/// Reformats free-form keyboard input as `MM`, `MM/YY` or `MM/YYYY`.
pub fn format_expiry_input(text: &str) -> String {
    let digits: String = sanitize(text).chars().take(MAX_INPUT_DIGITS).collect();
    if digits.len() <= 2 {
        return digits;
    }
    format!("{}/{}", &digits[..2], &digits[2..])
}

/// Normalizes an expiry to `MM/YY`.
///
/// Needs a 01-12 month followed by a two or four digit year; anything else
/// yields `None`.
pub fn normalize_expiry(text: &str) -> Option<String> {
    let digits = sanitize(text);
    if digits.len() < 4 {
        return None;
    }

    let (month, year) = digits.split_at(2);
    let month_num: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month_num) {
        return None;
    }

    match year.len() {
        2 => Some(format!("{month}/{year}")),
        4 => Some(format!("{month}/{}", &year[2..])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_expiry_input() {
        assert_eq!(format_expiry_input(""), "");
        assert_eq!(format_expiry_input("0"), "0");
        assert_eq!(format_expiry_input("08"), "08");
        assert_eq!(format_expiry_input("082"), "08/2");
        assert_eq!(format_expiry_input("08/27"), "08/27");
        assert_eq!(format_expiry_input("082027"), "08/2027");
        assert_eq!(format_expiry_input("08202799"), "08/2027");
    }

    #[test]
    fn test_normalize_expiry_accepts_two_and_four_digit_years() {
        assert_eq!(normalize_expiry("08/27").as_deref(), Some("08/27"));
        assert_eq!(normalize_expiry("08/2027").as_deref(), Some("08/27"));
        assert_eq!(normalize_expiry("12 / 30").as_deref(), Some("12/30"));
    }

    #[test]
    fn test_normalize_expiry_rejects_invalid() {
        assert_eq!(normalize_expiry("13/27"), None);
        assert_eq!(normalize_expiry("00/27"), None);
        assert_eq!(normalize_expiry("08/2"), None);
        assert_eq!(normalize_expiry("08/202"), None);
        assert_eq!(normalize_expiry(""), None);
    }
}
